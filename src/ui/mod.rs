//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: terminal setup and the loop that interleaves keyboard
//!   input with fragments pulled from the active reply.
//! - [`renderer`]: header, transcript, status line and input box.
//! - [`view`]: presentation state kept alongside the session.
//! - [`wrap`]: word wrapping of transcript lines into terminal rows.
//!
//! Domain state lives in [`crate::core`]; this layer only presents it and
//! captures input.

pub mod chat_loop;
pub mod renderer;
pub mod view;
pub mod wrap;
