//! Error taxonomy for chat turns.
//!
//! Every failure the chat core can produce is one of three kinds: an unknown
//! model id ([`NotFoundError`]), a request that breaks an input constraint
//! ([`ValidationError`]), or a fault reported by the remote API
//! ([`CompletionError`]). [`ChatError`] wraps them for the orchestrator, and
//! [`crate::core::notice`] turns it into display text.

use std::error::Error;
use std::fmt;

/// A model id that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundError {
    pub id: String,
    pub known: Vec<String>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown model '{}'. Available models: {}",
            self.id,
            self.known.join(", ")
        )
    }
}

impl Error for NotFoundError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The message content was empty or whitespace only.
    EmptyMessage,

    /// A completion was requested with no messages to send.
    EmptyTranscript,

    /// No model has been selected for the session yet.
    NoModelSelected,

    /// The token budget lies outside what the model accepts.
    MaxTokensOutOfRange {
        model: String,
        requested: u32,
        min: u32,
        max: u32,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyMessage => write!(f, "Message is empty"),
            ValidationError::EmptyTranscript => write!(f, "Nothing to send: transcript is empty"),
            ValidationError::NoModelSelected => write!(f, "No model selected"),
            ValidationError::MaxTokensOutOfRange {
                model,
                requested,
                min,
                max,
            } => write!(
                f,
                "Max tokens {requested} is outside {min}..={max} for model '{model}'"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Faults surfaced by the remote completion API or its transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Missing or rejected credentials (HTTP 401/403).
    Authentication(String),

    /// The provider throttled the request (HTTP 429).
    RateLimited(String),

    /// Any other non-success HTTP status, with the raw response body.
    Api { status: u16, body: String },

    /// Network failure while connecting or reading the body.
    Transport(String),

    /// An error payload or undecodable data line inside the event stream.
    Stream(String),
}

impl CompletionError {
    /// Maps a non-success HTTP status and its body onto the taxonomy.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => CompletionError::Authentication(body),
            429 => CompletionError::RateLimited(body),
            _ => CompletionError::Api { status, body },
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Authentication(detail) => {
                write!(f, "Authentication failed: {detail}")
            }
            CompletionError::RateLimited(detail) => write!(f, "Rate limited: {detail}"),
            CompletionError::Api { status, body } => {
                write!(f, "API request failed with status {status}: {body}")
            }
            CompletionError::Transport(detail) => write!(f, "Network error: {detail}"),
            CompletionError::Stream(detail) => write!(f, "Stream error: {detail}"),
        }
    }
}

impl Error for CompletionError {}

/// Everything that can end a chat turn without a stored reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    NotFound(NotFoundError),
    Validation(ValidationError),
    Completion(CompletionError),

    /// A turn was started while another one is still streaming.
    Busy,

    /// The turn was finished before its stream ran out.
    Interrupted,

    /// The model streamed no text at all.
    EmptyReply,
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::NotFound(err) => fmt::Display::fmt(err, f),
            ChatError::Validation(err) => fmt::Display::fmt(err, f),
            ChatError::Completion(err) => fmt::Display::fmt(err, f),
            ChatError::Busy => write!(f, "A response is still streaming"),
            ChatError::Interrupted => write!(f, "Response was interrupted before it finished"),
            ChatError::EmptyReply => write!(f, "The model returned an empty response"),
        }
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChatError::NotFound(err) => Some(err),
            ChatError::Validation(err) => Some(err),
            ChatError::Completion(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NotFoundError> for ChatError {
    fn from(err: NotFoundError) -> Self {
        ChatError::NotFound(err)
    }
}

impl From<ValidationError> for ChatError {
    fn from(err: ValidationError) -> Self {
        ChatError::Validation(err)
    }
}

impl From<CompletionError> for ChatError {
    fn from(err: CompletionError) -> Self {
        ChatError::Completion(err)
    }
}
