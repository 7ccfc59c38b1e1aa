//! Word wrapping for the transcript pane.
//!
//! Lines are broken into terminal rows here and rendered by a `Paragraph`
//! without wrapping, so the row count used for scrolling is the row count
//! that is drawn.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Splits text into alternating runs of whitespace and non-whitespace.
fn split_runs(text: &str) -> Vec<(&str, bool)> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (index, c) in text.char_indices() {
        let space = c.is_whitespace();
        if let Some(previous) = in_space {
            if previous != space {
                runs.push((&text[start..index], previous));
                start = index;
            }
        }
        in_space = Some(space);
    }
    if let Some(space) = in_space {
        runs.push((&text[start..], space));
    }
    runs
}

struct RowWrapper {
    width: usize,
    rows: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    used: usize,
    pending: Vec<Span<'static>>,
    pending_width: usize,
    continuation: bool,
    line_style: Style,
}

impl RowWrapper {
    fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
            current: Vec::new(),
            used: 0,
            pending: Vec::new(),
            pending_width: 0,
            continuation: false,
            line_style: Style::default(),
        }
    }

    fn start_line(&mut self, style: Style) {
        self.line_style = style;
        self.continuation = false;
    }

    fn break_row(&mut self) {
        self.pending.clear();
        self.pending_width = 0;
        let spans = std::mem::take(&mut self.current);
        self.rows.push(Line::from(spans).style(self.line_style));
        self.used = 0;
        self.continuation = true;
    }

    fn append(&mut self, text: &str, style: Style, width: usize) {
        self.current.push(Span::styled(text.to_string(), style));
        self.used += width;
    }

    /// Whitespace between words is held back until the next word shows it
    /// fits on the same row.
    fn push_space(&mut self, text: &str, style: Style) {
        let width = text.width();
        if self.used == 0 {
            // whitespace never opens a wrapped row
            if !self.continuation && width <= self.width {
                self.append(text, style, width);
            }
            return;
        }
        self.pending.push(Span::styled(text.to_string(), style));
        self.pending_width += width;
    }

    fn push_word(&mut self, text: &str, style: Style) {
        let width = text.width();
        if self.used > 0 && self.used + self.pending_width + width > self.width {
            self.break_row();
        } else {
            self.current.append(&mut self.pending);
            self.used += self.pending_width;
            self.pending_width = 0;
        }
        if width <= self.width {
            self.append(text, style, width);
            return;
        }

        let mut chunk = String::new();
        let mut chunk_width = 0;
        for c in text.chars() {
            let char_width = c.width().unwrap_or(0);
            if chunk_width > 0 && chunk_width + char_width > self.width {
                self.append(&chunk, style, chunk_width);
                chunk.clear();
                chunk_width = 0;
                self.break_row();
            }
            chunk.push(c);
            chunk_width += char_width;
        }
        if !chunk.is_empty() {
            self.append(&chunk, style, chunk_width);
        }
    }
}

/// Wraps styled lines at word boundaries so that every returned line fills
/// exactly one row of `width` columns. Words wider than a row are split.
pub fn wrap_lines(lines: &[Line<'static>], width: u16) -> Vec<Line<'static>> {
    let mut wrapper = RowWrapper::new(usize::from(width.max(1)));
    for line in lines {
        wrapper.start_line(line.style);
        for span in &line.spans {
            for (run, is_space) in split_runs(&span.content) {
                if is_space {
                    wrapper.push_space(run, span.style);
                } else {
                    wrapper.push_word(run, span.style);
                }
            }
        }
        wrapper.break_row();
    }
    wrapper.rows
}
