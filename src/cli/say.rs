//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use crate::cli::setup::ChatSetup;
use crate::core::notice::notice_for;

pub async fn run_say(setup: ChatSetup, prompt: Vec<String>) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: vers3chat say <prompt>");
        std::process::exit(1);
    }

    let ChatSetup {
        mut session,
        mut orchestrator,
        warnings,
        ..
    } = setup;
    for warning in warnings {
        eprintln!("⚠️  {warning}");
    }

    let mut turn = match orchestrator.begin_turn(&mut session, &prompt).await {
        Ok(turn) => turn,
        Err(err) => {
            eprintln!("❌ Error: {}", notice_for(&err));
            std::process::exit(1);
        }
    };

    let mut stdout = io::stdout();
    write!(stdout, "{}", turn.decoration().prefix())?;
    stdout.flush()?;
    while let Some(fragment) = turn.next_fragment().await {
        if let Ok(content) = fragment {
            write!(stdout, "{content}")?;
            stdout.flush()?;
        }
    }
    let suffix = turn.decoration().suffix().to_string();

    match orchestrator.finish_turn(&mut session, turn) {
        Ok(_) => {
            writeln!(stdout, "{suffix}")?;
            Ok(())
        }
        Err(err) => {
            writeln!(stdout)?;
            eprintln!("\n❌ Error: {}", notice_for(&err));
            std::process::exit(1);
        }
    }
}
