use super::{CommandContext, CommandResult};

pub type CommandHandler = fn(&mut CommandContext<'_>, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands and key bindings.",
        handler: super::handle_help,
    },
    Command {
        name: "model",
        usage: "/model [id]",
        help: "Show the current model or switch to another one (clears the chat).",
        handler: super::handle_model,
    },
    Command {
        name: "models",
        usage: "/models",
        help: "List the available models.",
        handler: super::handle_models,
    },
    Command {
        name: "tokens",
        usage: "/tokens [n]",
        help: "Show or set the max tokens for the next reply.",
        handler: super::handle_tokens,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Clear the chat history.",
        handler: super::handle_clear,
    },
];
