//! Per-session chat state: transcript, selected model and token budget.

use tracing::debug;

use crate::core::budget;
use crate::core::error::{NotFoundError, ValidationError};
use crate::core::message::Message;
use crate::core::models::{ModelDescriptor, ModelRegistry};

/// Conversation state for one interactive session.
///
/// The session is created empty, owned by whoever drives the chat (the
/// terminal loop or a one-shot command), and dropped with it.
#[derive(Debug, Clone)]
pub struct SessionState {
    transcript: Vec<Message>,
    selected_model: Option<ModelDescriptor>,
    max_tokens: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            selected_model: None,
            max_tokens: budget::MIN_MAX_TOKENS,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn selected_model(&self) -> Option<&ModelDescriptor> {
        self.selected_model.as_ref()
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn append(&mut self, message: Message) -> Result<(), ValidationError> {
        if message.content.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        self.transcript.push(message);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.transcript.clear();
    }

    /// Selects a registry model. Returns whether the selection changed; a
    /// change clears the transcript and restores the model's default budget.
    pub fn select_model(
        &mut self,
        registry: &ModelRegistry,
        id: &str,
    ) -> Result<bool, NotFoundError> {
        let model = registry.get(id)?;
        if self
            .selected_model
            .as_ref()
            .is_some_and(|current| current.id == model.id)
        {
            return Ok(false);
        }

        self.reset();
        self.max_tokens = budget::default_for(model);
        self.selected_model = Some(model.clone());
        debug!(model = %model.id, max_tokens = self.max_tokens, "selected model");
        Ok(true)
    }

    pub fn set_max_tokens(&mut self, max_tokens: u32) -> Result<(), ValidationError> {
        let model = self
            .selected_model
            .as_ref()
            .ok_or(ValidationError::NoModelSelected)?;
        self.max_tokens = budget::validate(max_tokens, model)?;
        Ok(())
    }

    /// Moves the budget by whole steps within the selected model's range.
    pub fn step_max_tokens(&mut self, steps: i32) -> u32 {
        if let Some(model) = self.selected_model.as_ref() {
            self.max_tokens = budget::step(self.max_tokens, steps, model);
        }
        self.max_tokens
    }
}
