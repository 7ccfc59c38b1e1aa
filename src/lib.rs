//! vers3chat is a terminal chat client for Groq-hosted language models.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the model registry, session state, the streamed completion
//!   pipeline, sentiment scoring and reply embellishment, and the chat
//!   orchestrator that ties them together.
//! - [`ui`] renders the terminal interface and runs the interactive loop.
//! - [`commands`] implements slash-command parsing used by the chat loop.
//! - [`api`] defines the chat completion payloads sent to and read from Groq.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
pub mod ui;
