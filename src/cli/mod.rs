//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod auth;
pub mod model_list;
pub mod say;
pub mod settings;
pub mod setup;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::auth::{run_auth, run_deauth};
use crate::cli::model_list::list_models;
use crate::cli::say::run_say;
use crate::cli::settings::{set_value, unset_value};
use crate::cli::setup::ChatSetup;
use crate::core::config::Config;
use crate::logging::{init_tracing, LogTarget};
use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "vers3chat")]
#[command(about = "A terminal chat interface for Groq-hosted models")]
#[command(
    long_about = "vers3chat is a full-screen terminal chat interface for models hosted on Groq. \
Replies stream in as they are generated and can be decorated with an emoji that matches \
the mood of your message.\n\n\
Authentication:\n\
  Use 'vers3chat auth' to store your API key in the system keyring.\n\n\
Environment Variables:\n\
  GROQ_API_KEY      Your Groq API key (takes precedence over the keyring)\n\
  GROQ_BASE_URL     Custom API base URL (optional, defaults to https://api.groq.com/openai/v1)\n\
  RUST_LOG          Log filter for --debug-log and non-interactive commands\n\n\
Controls:\n\
  Enter             Send the message\n\
  Tab/Shift+Tab     Switch to the next/previous model (clears the chat)\n\
  PgUp/PgDn         Raise/lower max tokens by 512\n\
  Up/Down           Scroll through chat history\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             Show commands and keys\n\
  /model <id>       Switch model\n\
  /tokens <n>       Set max tokens"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to chat with (see `vers3chat models`)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Maximum tokens per reply; clamped to the model's range
    #[arg(short = 't', long, global = true, value_name = "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Do not decorate replies with sentiment emoji
    #[arg(long, global = true)]
    pub plain: bool,

    /// Only read the API key from GROQ_API_KEY, never the keyring
    #[arg(long, global = true)]
    pub env_only: bool,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one prompt and print the streamed reply
    Say {
        /// Prompt text (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List available models
    Models,
    /// Store the API key in the system keyring
    Auth,
    /// Remove the API key from the system keyring
    Deauth,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        value: Option<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);

    let log_target = match (&args.debug_log, &command) {
        (Some(path), _) => LogTarget::File(path),
        (None, Commands::Chat) => LogTarget::Disabled,
        (None, _) => LogTarget::Stderr,
    };
    init_tracing(log_target)?;

    match command {
        Commands::Chat => {
            let config = Config::load()?;
            let setup = ChatSetup::resolve(
                &config,
                args.model.as_deref(),
                args.max_tokens,
                args.plain,
                args.env_only,
            )?;
            run_chat(setup).await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let setup = ChatSetup::resolve(
                &config,
                args.model.as_deref(),
                args.max_tokens,
                args.plain,
                args.env_only,
            )?;
            run_say(setup, prompt).await
        }
        Commands::Models => {
            let config = Config::load()?;
            list_models(&config);
            Ok(())
        }
        Commands::Auth => run_auth(),
        Commands::Deauth => run_deauth(),
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            match (key, value) {
                (Some(key), Some(value)) => {
                    let message = set_value(&mut config, &key, &value)?;
                    config.save()?;
                    println!("✅ {message}");
                }
                _ => config.print_all(),
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            let message = unset_value(&mut config, &key)?;
            config.save()?;
            println!("✅ {message}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_chat() {
        let args = Args::try_parse_from(["vers3chat"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.plain);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let args = Args::try_parse_from([
            "vers3chat",
            "say",
            "-m",
            "llama3-8b-8192",
            "-t",
            "1024",
            "--plain",
            "hello",
            "there",
        ])
        .unwrap();
        assert_eq!(args.model.as_deref(), Some("llama3-8b-8192"));
        assert_eq!(args.max_tokens, Some(1024));
        assert!(args.plain);
        match args.command {
            Some(Commands::Say { prompt }) => assert_eq!(prompt, vec!["hello", "there"]),
            _ => panic!("expected say command"),
        }
    }

    #[test]
    fn max_tokens_must_be_numeric() {
        assert!(Args::try_parse_from(["vers3chat", "-t", "lots"]).is_err());
    }

    #[test]
    fn set_without_value_parses() {
        let args = Args::try_parse_from(["vers3chat", "set"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Commands::Set {
                key: None,
                value: None
            })
        ));
    }
}
