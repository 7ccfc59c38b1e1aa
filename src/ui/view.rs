//! Presentation state for the interactive chat screen.
//!
//! The transcript itself lives in [`SessionState`](crate::core::session::SessionState);
//! this only tracks what the terminal needs on top of it.

use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    /// Number of transcript messages that precede this notice.
    pub after: usize,
}

#[derive(Debug, Default)]
pub struct ChatView {
    pub input: String,
    pub notices: Vec<Notice>,
    /// Wrapped rows scrolled up from the bottom of the transcript.
    pub scroll_from_bottom: u16,
    /// Shown in the status line while a request is being opened.
    pub status: Option<String>,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_notice(&mut self, kind: NoticeKind, text: impl Into<String>, after: usize) {
        self.notices.push(Notice {
            kind,
            text: text.into(),
            after,
        });
        self.scroll_to_bottom();
    }

    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(rows);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }

    /// Takes the trimmed input for submission, leaving the buffer empty.
    /// Returns `None` for blank input so nothing is sent.
    pub fn take_input(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.input);
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Display column of the cursor at the end of the input buffer.
    pub fn cursor_column(&self) -> u16 {
        u16::try_from(self.input.width()).unwrap_or(u16::MAX)
    }
}
