//! Chat turn orchestration.
//!
//! A turn moves the orchestrator from [`Phase::Idle`] to [`Phase::Streaming`]
//! when user input is accepted and back to idle once the reply stream is
//! finished or abandoned. The caller owns the [`SessionState`] and passes it
//! in; the orchestrator is the only code that mutates it during a turn.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::core::chat_stream::{stream_completion, CompletionClient, FragmentStream};
use crate::core::emotion::Decoration;
use crate::core::error::{ChatError, CompletionError, ValidationError};
use crate::core::message::Message;
use crate::core::sentiment::SentimentClassifier;
use crate::core::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Streaming,
}

/// A reply in progress. Pull fragments with [`ActiveTurn::next_fragment`]
/// until it returns `None`, then hand the turn back to
/// [`ChatOrchestrator::finish_turn`].
pub struct ActiveTurn {
    fragments: FragmentStream,
    collected: String,
    decoration: Decoration,
    fragment_count: usize,
    failure: Option<CompletionError>,
    exhausted: bool,
}

impl ActiveTurn {
    fn new(fragments: FragmentStream, decoration: Decoration) -> Self {
        Self {
            fragments,
            collected: String::new(),
            decoration,
            fragment_count: 0,
            failure: None,
            exhausted: false,
        }
    }

    /// Waits for the next fragment. After an error or the end of the stream
    /// this keeps returning `None`. Dropping the returned future before it
    /// resolves loses nothing.
    pub async fn next_fragment(&mut self) -> Option<Result<String, CompletionError>> {
        if self.exhausted {
            return None;
        }

        match self.fragments.next().await {
            Some(Ok(fragment)) => {
                self.collected.push_str(&fragment);
                self.fragment_count += 1;
                Some(Ok(fragment))
            }
            Some(Err(err)) => {
                self.exhausted = true;
                self.failure = Some(err.clone());
                Some(Err(err))
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }

    /// Raw reply text received so far.
    pub fn text(&self) -> &str {
        &self.collected
    }

    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }

    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

pub struct ChatOrchestrator {
    client: Arc<dyn CompletionClient>,
    classifier: Option<SentimentClassifier>,
    phase: Phase,
}

impl ChatOrchestrator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            classifier: None,
            phase: Phase::Idle,
        }
    }

    /// Decorates replies according to the sentiment of the user's input.
    pub fn with_emotion(mut self, classifier: SentimentClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_streaming(&self) -> bool {
        self.phase == Phase::Streaming
    }

    /// Accepts user input: validates it, appends it to the transcript and
    /// opens the reply stream. A failed open leaves the user message in
    /// place and the orchestrator idle.
    pub async fn begin_turn(
        &mut self,
        session: &mut SessionState,
        input: &str,
    ) -> Result<ActiveTurn, ChatError> {
        if self.is_streaming() {
            return Err(ChatError::Busy);
        }
        if input.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        let model = session
            .selected_model()
            .cloned()
            .ok_or(ValidationError::NoModelSelected)?;
        crate::core::budget::validate(session.max_tokens(), &model)?;

        session.append(Message::user(input))?;
        self.phase = Phase::Streaming;

        let decoration = self
            .classifier
            .as_ref()
            .map(|classifier| Decoration::for_sentiment(classifier.classify(input)))
            .unwrap_or_else(Decoration::none);

        match stream_completion(
            self.client.as_ref(),
            session.transcript(),
            &model,
            session.max_tokens(),
        )
        .await
        {
            Ok(fragments) => Ok(ActiveTurn::new(fragments, decoration)),
            Err(err) => {
                self.phase = Phase::Idle;
                warn!(error = %err, "failed to open completion stream");
                Err(err)
            }
        }
    }

    /// Ends a turn. Only a stream that ran to completion without error and
    /// produced text becomes an assistant message.
    pub fn finish_turn(
        &mut self,
        session: &mut SessionState,
        mut turn: ActiveTurn,
    ) -> Result<Message, ChatError> {
        self.phase = Phase::Idle;

        if let Some(err) = turn.failure.take() {
            warn!(
                error = %err,
                fragments = turn.fragment_count,
                "completion stream failed; discarding partial reply"
            );
            return Err(err.into());
        }
        if !turn.exhausted {
            return Err(ChatError::Interrupted);
        }
        if turn.collected.is_empty() {
            return Err(ChatError::EmptyReply);
        }

        let message = Message::assistant(turn.decoration.apply(&turn.collected));
        session.append(message.clone())?;
        debug!(
            fragments = turn.fragment_count,
            chars = turn.collected.len(),
            "stored assistant reply"
        );
        Ok(message)
    }

    /// Drops a turn without storing anything.
    pub fn abandon_turn(&mut self, turn: ActiveTurn) {
        self.phase = Phase::Idle;
        debug!(fragments = turn.fragment_count, "abandoned completion stream");
    }

    /// Runs a whole turn, pushing each fragment to `on_fragment` as it
    /// arrives.
    pub async fn send<F>(
        &mut self,
        session: &mut SessionState,
        input: &str,
        mut on_fragment: F,
    ) -> Result<Message, ChatError>
    where
        F: FnMut(&str),
    {
        let mut turn = self.begin_turn(session, input).await?;
        while let Some(fragment) = turn.next_fragment().await {
            if let Ok(text) = fragment {
                on_fragment(&text);
            }
        }
        self.finish_turn(session, turn)
    }
}
