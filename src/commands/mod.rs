mod registry;

pub use registry::{all_commands, CommandInvocation};

use crate::core::error::ChatError;
use crate::core::models::ModelRegistry;
use crate::core::notice::notice_for;
use crate::core::session::SessionState;

pub struct CommandContext<'a> {
    pub registry: &'a ModelRegistry,
    pub session: &'a mut SessionState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    ProcessAsMessage(String),
    Reply(String),
    Failed(String),
    /// The command emptied the transcript; earlier notices are stale.
    TranscriptCleared(String),
}

pub fn process_input(ctx: &mut CommandContext<'_>, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => (command.handler)(ctx, CommandInvocation { args }),
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

pub fn help_text() -> String {
    let mut help = String::from("Commands:");
    for command in all_commands() {
        help.push_str(&format!("\n  {:<12} {}", command.usage, command.help));
    }
    help.push_str(
        "\nKeys:\
         \n  Enter        send the message\
         \n  Tab          next model (Shift+Tab for previous)\
         \n  PgUp/PgDn    raise or lower max tokens\
         \n  ↑/↓          scroll the chat\
         \n  Ctrl+C       quit",
    );
    help
}

pub(super) fn handle_help(
    _ctx: &mut CommandContext<'_>,
    _inv: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Reply(help_text())
}

pub(super) fn handle_model(
    ctx: &mut CommandContext<'_>,
    inv: CommandInvocation<'_>,
) -> CommandResult {
    if inv.args.is_empty() {
        return match ctx.session.selected_model() {
            Some(model) => CommandResult::Reply(format!(
                "Current model: {} ({}). Usage: /model <id>",
                model.id, model.display_name
            )),
            None => CommandResult::Reply("No model selected. Usage: /model <id>".to_string()),
        };
    }

    match ctx.session.select_model(ctx.registry, inv.args) {
        Ok(true) => {
            let model = ctx.registry.get(inv.args).map(|m| m.display_name.as_str());
            CommandResult::TranscriptCleared(format!(
                "Switched to {} • chat cleared",
                model.unwrap_or(inv.args)
            ))
        }
        Ok(false) => CommandResult::Reply(format!("Already using {}", inv.args)),
        Err(err) => CommandResult::Failed(notice_for(&ChatError::from(err))),
    }
}

pub(super) fn handle_models(
    ctx: &mut CommandContext<'_>,
    _inv: CommandInvocation<'_>,
) -> CommandResult {
    let current = ctx.session.selected_model().map(|m| m.id.as_str());
    let mut listing = String::from("Available models:");
    for model in ctx.registry.list() {
        let marker = if Some(model.id.as_str()) == current { "*" } else { " " };
        listing.push_str(&format!(
            "\n{marker} {} • {} • {} tokens • {}",
            model.id, model.display_name, model.max_tokens, model.developer
        ));
    }
    CommandResult::Reply(listing)
}

pub(super) fn handle_tokens(
    ctx: &mut CommandContext<'_>,
    inv: CommandInvocation<'_>,
) -> CommandResult {
    if inv.args.is_empty() {
        return CommandResult::Reply(format!(
            "Max tokens: {}. Usage: /tokens <n>",
            ctx.session.max_tokens()
        ));
    }

    let Ok(requested) = inv.args.parse::<u32>() else {
        return CommandResult::Failed(format!("'{}' is not a whole number", inv.args));
    };
    match ctx.session.set_max_tokens(requested) {
        Ok(()) => CommandResult::Reply(format!("Max tokens set to {requested}")),
        Err(err) => CommandResult::Failed(notice_for(&ChatError::from(err))),
    }
}

pub(super) fn handle_clear(
    ctx: &mut CommandContext<'_>,
    _inv: CommandInvocation<'_>,
) -> CommandResult {
    ctx.session.reset();
    CommandResult::TranscriptCleared("Chat cleared".to_string())
}
