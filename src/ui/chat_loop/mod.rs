//! Interactive chat screen: terminal lifecycle plus the input/stream loop.

mod event_loop;
mod lifecycle;

use std::error::Error;

use crate::cli::setup::ChatSetup;
use crate::ui::view::NoticeKind;

use event_loop::ChatLoop;
use lifecycle::{restore_terminal, setup_terminal};

pub async fn run_chat(setup: ChatSetup) -> Result<(), Box<dyn Error>> {
    let mut chat = ChatLoop::new(setup.registry, setup.session, setup.orchestrator);
    for warning in setup.warnings {
        chat.notice(NoticeKind::Warning, warning);
    }

    let mut terminal = setup_terminal()?;
    let result = chat.run(&mut terminal).await;
    let restored = restore_terminal(&mut terminal);
    result.and(restored)
}
