use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::message::{Message, Role};
use crate::core::session::SessionState;
use crate::ui::view::{ChatView, Notice, NoticeKind};
use crate::ui::wrap::wrap_lines;

const IDLE_HINT: &str =
    "Enter send • Tab/Shift+Tab model • PgUp/PgDn tokens • ↑/↓ scroll • /help • Ctrl+C quit";

/// Reply text of the turn currently streaming, drawn after the transcript.
#[derive(Debug, Clone, Copy)]
pub struct PendingReply<'a> {
    pub prefix: &'a str,
    pub text: &'a str,
}

fn message_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan),
        Role::Assistant => Style::default(),
    }
}

fn push_message_lines(lines: &mut Vec<Line<'static>>, role: Role, content: &str) {
    let style = message_style(role);
    let mut rows = content.split('\n');
    let first = rows.next().unwrap_or_default();
    lines.push(Line::from(vec![
        Span::raw(format!("{} ", role.avatar())),
        Span::styled(first.to_string(), style),
    ]));
    for row in rows {
        lines.push(Line::from(Span::styled(format!("   {row}"), style)));
    }
    lines.push(Line::from(""));
}

fn push_notice_line(lines: &mut Vec<Line<'static>>, notice: &Notice) {
    let (marker, style) = match notice.kind {
        NoticeKind::Info => ("ℹ️  ", Style::default().fg(Color::DarkGray)),
        NoticeKind::Warning => ("⚠️  ", Style::default().fg(Color::Yellow)),
        NoticeKind::Error => ("❌ ", Style::default().fg(Color::Red)),
    };
    for (index, row) in notice.text.split('\n').enumerate() {
        let lead = if index == 0 { marker } else { "   " };
        lines.push(Line::from(Span::styled(format!("{lead}{row}"), style)));
    }
    lines.push(Line::from(""));
}

/// Flattens transcript, notices and the in-flight reply into display lines.
pub fn build_display_lines(
    session: &SessionState,
    view: &ChatView,
    pending: Option<PendingReply<'_>>,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let transcript: &[Message] = session.transcript();

    for position in 0..=transcript.len() {
        for notice in view.notices.iter().filter(|n| n.after == position) {
            push_notice_line(&mut lines, notice);
        }
        if let Some(message) = transcript.get(position) {
            push_message_lines(&mut lines, message.role, &message.content);
        }
    }
    // notices recorded before a reset may point past the end
    for notice in view.notices.iter().filter(|n| n.after > transcript.len()) {
        push_notice_line(&mut lines, notice);
    }

    if let Some(reply) = pending {
        let mut content = format!("{}{}", reply.prefix, reply.text);
        content.push('▌');
        push_message_lines(&mut lines, Role::Assistant, &content);
    }
    lines
}

fn header_line(session: &SessionState) -> Line<'static> {
    let title = Span::styled(
        format!("👽 Vers3Dynamics Chat v{}", env!("CARGO_PKG_VERSION")),
        Style::default().add_modifier(Modifier::BOLD),
    );
    let details = match session.selected_model() {
        Some(model) => format!(
            " • {} by {} • Max Tokens🪙 {}/{}",
            model.display_name,
            model.developer,
            session.max_tokens(),
            model.max_tokens
        ),
        None => " • no model selected".to_string(),
    };
    Line::from(vec![title, Span::raw(details)])
}

pub fn ui(
    f: &mut Frame,
    session: &SessionState,
    view: &ChatView,
    pending: Option<PendingReply<'_>>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    f.render_widget(Paragraph::new(header_line(session)), chunks[0]);

    let streaming = pending.is_some();
    let lines = build_display_lines(session, view, pending);
    let rows = wrap_lines(&lines, chunks[1].width);
    let total_rows = u16::try_from(rows.len()).unwrap_or(u16::MAX);
    let max_offset = total_rows.saturating_sub(chunks[1].height);
    let scroll_offset = max_offset.saturating_sub(view.scroll_from_bottom);

    f.render_widget(
        Paragraph::new(rows).scroll((scroll_offset, 0)),
        chunks[1],
    );

    let status = if streaming {
        Line::from(Span::styled(
            "● Streaming reply… (Ctrl+C to quit)",
            Style::default().fg(Color::Green),
        ))
    } else if let Some(status) = &view.status {
        Line::from(Span::styled(status.clone(), Style::default().fg(Color::Green)))
    } else {
        Line::from(Span::styled(IDLE_HINT, Style::default().fg(Color::DarkGray)))
    };
    f.render_widget(Paragraph::new(status), chunks[2]);

    let inner_width = chunks[3].width.saturating_sub(2).max(1);
    let cursor = view.cursor_column();
    let horizontal_scroll = cursor.saturating_sub(inner_width - 1);
    let input = Paragraph::new(view.input.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Reset))
                .title("Type your message"),
        )
        .scroll((0, horizontal_scroll));
    f.render_widget(input, chunks[3]);

    f.set_cursor_position((
        chunks[3].x + 1 + (cursor - horizontal_scroll),
        chunks[3].y + 1,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ModelRegistry;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    fn session_with_pair() -> SessionState {
        let mut session = SessionState::new();
        session
            .select_model(ModelRegistry::builtin(), "llama3-8b-8192")
            .unwrap();
        session.append(Message::user("hello")).unwrap();
        session
            .append(Message::assistant("hi\nhow can I help?"))
            .unwrap();
        session
    }

    #[test]
    fn transcript_lines_carry_avatars_and_continuations() {
        let session = session_with_pair();
        let text = plain(&build_display_lines(&session, &ChatView::new(), None));
        assert_eq!(
            text,
            vec![
                "👨🏾‍💻 hello",
                "",
                "🐶 hi",
                "   how can I help?",
                "",
            ]
        );
    }

    #[test]
    fn notices_are_placed_after_their_message() {
        let session = session_with_pair();
        let mut view = ChatView::new();
        view.push_notice(NoticeKind::Warning, "clamped", 0);
        view.push_notice(NoticeKind::Error, "rate limited", 1);

        let text = plain(&build_display_lines(&session, &view, None));
        assert!(text[0].ends_with("clamped"));
        assert_eq!(text[2], "👨🏾‍💻 hello");
        assert!(text[4].ends_with("rate limited"));
        assert_eq!(text[6], "🐶 hi");
    }

    #[test]
    fn pending_reply_shows_prefix_and_cursor() {
        let session = session_with_pair();
        let pending = PendingReply {
            prefix: "😄 I'm glad to hear that! ",
            text: "Sure",
        };
        let text = plain(&build_display_lines(&session, &ChatView::new(), Some(pending)));
        assert_eq!(
            text[text.len() - 2],
            "🐶 😄 I'm glad to hear that! Sure▌"
        );
    }

    #[test]
    fn long_reply_tail_stays_on_screen() {
        let mut session = SessionState::new();
        session
            .select_model(ModelRegistry::builtin(), "llama3-8b-8192")
            .unwrap();
        session.append(Message::user("tell me a story")).unwrap();
        let mut reply = vec!["lorem"; 40].join(" ");
        reply.push_str(" TAILMARKER");
        session.append(Message::assistant(reply)).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(20, 12)).unwrap();
        terminal
            .draw(|f| ui(f, &session, &ChatView::new(), None))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>() + "\n")
            .collect();
        assert!(screen.contains("TAILMARKER"), "{screen}");
    }
}
