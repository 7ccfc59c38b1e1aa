use std::error::Error;
use std::io;
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use tracing::debug;

use crate::commands::{self, CommandContext, CommandResult};
use crate::core::error::ChatError;
use crate::core::models::ModelRegistry;
use crate::core::notice::notice_for;
use crate::core::orchestrator::{ActiveTurn, ChatOrchestrator};
use crate::core::session::SessionState;
use crate::ui::renderer::{self, PendingReply};
use crate::ui::view::{ChatView, NoticeKind};

/// How long to wait for a fragment before checking the keyboard again.
const FRAGMENT_WAIT: Duration = Duration::from_millis(30);
const IDLE_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KeyAction {
    Handled,
    Ignored,
    Submit,
    Quit,
    CycleModel { forward: bool },
    StepTokens(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LoopControl {
    Continue,
    Quit,
}

/// Applies editing and scrolling keys to the view and reports anything the
/// loop itself has to act on.
pub(super) fn apply_key(view: &mut ChatView, key: KeyEvent) -> KeyAction {
    let ctrl_or_alt = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Tab => KeyAction::CycleModel { forward: true },
        KeyCode::BackTab => KeyAction::CycleModel { forward: false },
        KeyCode::PageUp => KeyAction::StepTokens(1),
        KeyCode::PageDown => KeyAction::StepTokens(-1),
        KeyCode::Up => {
            view.scroll_up(1);
            KeyAction::Handled
        }
        KeyCode::Down => {
            view.scroll_down(1);
            KeyAction::Handled
        }
        KeyCode::End => {
            view.scroll_to_bottom();
            KeyAction::Handled
        }
        KeyCode::Esc => {
            view.input.clear();
            KeyAction::Handled
        }
        KeyCode::Backspace => {
            view.input.pop();
            KeyAction::Handled
        }
        KeyCode::Char(c) if !ctrl_or_alt => {
            view.input.push(c);
            KeyAction::Handled
        }
        _ => KeyAction::Ignored,
    }
}

pub(super) struct ChatLoop {
    registry: &'static ModelRegistry,
    session: SessionState,
    orchestrator: ChatOrchestrator,
    view: ChatView,
    active: Option<ActiveTurn>,
}

impl ChatLoop {
    pub(super) fn new(
        registry: &'static ModelRegistry,
        session: SessionState,
        orchestrator: ChatOrchestrator,
    ) -> Self {
        Self {
            registry,
            session,
            orchestrator,
            view: ChatView::new(),
            active: None,
        }
    }

    pub(super) fn notice(&mut self, kind: NoticeKind, text: impl Into<String>) {
        let after = self.session.len();
        self.view.push_notice(kind, text, after);
    }

    fn notice_error(&mut self, err: &ChatError) {
        self.notice(NoticeKind::Error, notice_for(err));
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let pending = self.active.as_ref().map(|turn| PendingReply {
            prefix: turn.decoration().prefix(),
            text: turn.text(),
        });
        terminal.draw(|f| renderer::ui(f, &self.session, &self.view, pending))?;
        Ok(())
    }

    pub(super) async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), Box<dyn Error>> {
        loop {
            self.draw(terminal)?;
            self.pump_stream().await;

            let wait = if self.active.is_some() {
                Duration::ZERO
            } else {
                IDLE_POLL
            };
            if !event::poll(wait)? {
                continue;
            }

            loop {
                if self.handle_event(terminal, event::read()?).await? == LoopControl::Quit {
                    return Ok(());
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }

    /// Pulls at most one fragment, giving up after [`FRAGMENT_WAIT`] so input
    /// stays responsive. Settles the turn once its stream is done.
    pub(super) async fn pump_stream(&mut self) {
        let Some(turn) = self.active.as_mut() else {
            return;
        };
        if tokio::time::timeout(FRAGMENT_WAIT, turn.next_fragment())
            .await
            .is_err()
        {
            return;
        }
        if turn.is_exhausted() {
            self.finish_active();
        }
    }

    fn finish_active(&mut self) {
        let Some(turn) = self.active.take() else {
            return;
        };
        debug!(fragments = turn.fragment_count(), "reply stream ended");
        if let Err(err) = self.orchestrator.finish_turn(&mut self.session, turn) {
            self.notice_error(&err);
        }
        self.view.scroll_to_bottom();
    }

    pub(super) async fn handle_event<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        event: Event,
    ) -> Result<LoopControl, Box<dyn Error>> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.handle_key(terminal, key).await
            }
            Event::Paste(text) => {
                self.view.input.push_str(&text.replace(['\r', '\n'], " "));
                Ok(LoopControl::Continue)
            }
            _ => Ok(LoopControl::Continue),
        }
    }

    async fn handle_key<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        key: KeyEvent,
    ) -> Result<LoopControl, Box<dyn Error>> {
        match apply_key(&mut self.view, key) {
            KeyAction::Quit => {
                if let Some(turn) = self.active.take() {
                    self.orchestrator.abandon_turn(turn);
                }
                return Ok(LoopControl::Quit);
            }
            KeyAction::Submit => self.submit(terminal).await?,
            KeyAction::CycleModel { forward } => self.cycle_model(forward),
            KeyAction::StepTokens(steps) => {
                self.session.step_max_tokens(steps);
            }
            KeyAction::Handled | KeyAction::Ignored => {}
        }
        Ok(LoopControl::Continue)
    }

    async fn submit<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        if self.active.is_some() {
            self.notice(
                NoticeKind::Info,
                "Still streaming the last reply; press Enter again once it finishes",
            );
            return Ok(());
        }
        let Some(input) = self.view.take_input() else {
            return Ok(());
        };

        let mut ctx = CommandContext {
            registry: self.registry,
            session: &mut self.session,
        };
        match commands::process_input(&mut ctx, &input) {
            CommandResult::ProcessAsMessage(text) => self.start_turn(terminal, &text).await?,
            CommandResult::Reply(text) => self.notice(NoticeKind::Info, text),
            CommandResult::Failed(text) => self.notice(NoticeKind::Error, text),
            CommandResult::TranscriptCleared(text) => {
                self.view.clear_notices();
                self.notice(NoticeKind::Info, text);
            }
        }
        Ok(())
    }

    async fn start_turn<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        text: &str,
    ) -> io::Result<()> {
        self.view.status = Some("Waiting for the model…".to_string());
        self.draw(terminal)?;
        let opened = self.orchestrator.begin_turn(&mut self.session, text).await;
        self.view.status = None;

        match opened {
            Ok(turn) => {
                self.active = Some(turn);
                self.view.scroll_to_bottom();
            }
            Err(err) => self.notice_error(&err),
        }
        Ok(())
    }

    fn cycle_model(&mut self, forward: bool) {
        if self.active.is_some() {
            self.notice(
                NoticeKind::Info,
                "Model switching is disabled while a reply is streaming",
            );
            return;
        }
        let Some(current) = self.session.selected_model().map(|m| m.id.clone()) else {
            return;
        };
        let target = if forward {
            self.registry.next(&current)
        } else {
            self.registry.previous(&current)
        };

        match self.session.select_model(self.registry, &target.id) {
            Ok(true) => {
                self.view.clear_notices();
                self.notice(
                    NoticeKind::Info,
                    format!(
                        "Switched to {} by {} • chat cleared",
                        target.display_name, target.developer
                    ),
                );
            }
            Ok(false) => {}
            Err(err) => self.notice_error(&ChatError::from(err)),
        }
    }
}

#[cfg(test)]
#[path = "event_loop_tests.rs"]
mod tests;
