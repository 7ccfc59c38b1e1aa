//! Completion pipeline
//!
//! Sends the transcript to the remote `chat/completions` endpoint and hands
//! back the reply as a lazy, single-pass stream of text fragments. Fragments
//! are yielded in arrival order as soon as each network chunk is decoded.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use memchr::memchr;
use tracing::{debug, warn};

use crate::api::{ChatRequest, ChatResponse};
use crate::core::budget;
use crate::core::error::{ChatError, CompletionError, ValidationError};
use crate::core::message::Message;
use crate::core::models::ModelDescriptor;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Reply fragments in arrival order. Ends after the last fragment or after
/// the first error.
pub type FragmentStream = BoxStream<'static, Result<String, CompletionError>>;

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn open(&self, request: ChatRequest) -> Result<FragmentStream, CompletionError>;
}

/// Validates the request and opens a streamed completion for `transcript`.
/// Validation failures return before anything is sent.
pub async fn stream_completion(
    client: &dyn CompletionClient,
    transcript: &[Message],
    model: &ModelDescriptor,
    max_tokens: u32,
) -> Result<FragmentStream, ChatError> {
    if transcript.is_empty() {
        return Err(ValidationError::EmptyTranscript.into());
    }
    let max_tokens = budget::validate(max_tokens, model)?;

    let request = ChatRequest {
        model: model.id.clone(),
        messages: transcript.iter().map(Message::to_api).collect(),
        max_tokens,
        stream: true,
    };

    debug!(
        model = %request.model,
        max_tokens,
        messages = request.messages.len(),
        "opening completion stream"
    );
    Ok(client.open(request).await?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SseEvent {
    Content(String),
    Done,
    Failure(String),
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn handle_data_payload(payload: &str) -> Option<SseEvent> {
    if payload == "[DONE]" {
        return Some(SseEvent::Done);
    }
    if payload.trim().is_empty() {
        return None;
    }

    let failure = || Some(SseEvent::Failure(payload.to_string()));
    let value = match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(value) => value,
        Err(_) => return failure(),
    };
    if value.get("error").is_some() {
        return failure();
    }

    match serde_json::from_value::<ChatResponse>(value) {
        Ok(response) => response
            .content()
            .map(|content| SseEvent::Content(content.to_string())),
        Err(_) => failure(),
    }
}

/// Splits a server-sent-event body into data events. Bytes are buffered only
/// until the end of the current line.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub(crate) fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            match std::str::from_utf8(&line) {
                Ok(text) => events.extend(Self::decode_line(text.trim())),
                Err(err) => events.push(SseEvent::Failure(format!(
                    "Invalid UTF-8 in stream: {err}"
                ))),
            }
        }

        events
    }

    /// Flushes a trailing line that arrived without a newline.
    pub(crate) fn finish(&mut self) -> Vec<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        match std::str::from_utf8(&rest) {
            Ok(text) => Self::decode_line(text.trim()).into_iter().collect(),
            Err(err) => vec![SseEvent::Failure(format!("Invalid UTF-8 in stream: {err}"))],
        }
    }

    fn decode_line(line: &str) -> Option<SseEvent> {
        extract_data_payload(line).and_then(handle_data_payload)
    }
}

struct SseStreamState {
    body: BoxStream<'static, Result<Vec<u8>, CompletionError>>,
    decoder: SseDecoder,
    pending: VecDeque<SseEvent>,
    finished: bool,
}

/// Turns a raw event-stream body into a fragment stream.
pub(crate) fn fragments_from_body(
    body: BoxStream<'static, Result<Vec<u8>, CompletionError>>,
) -> FragmentStream {
    let state = SseStreamState {
        body,
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                match event {
                    SseEvent::Content(text) => return Some((Ok(text), state)),
                    SseEvent::Done => return None,
                    SseEvent::Failure(payload) => {
                        state.pending.clear();
                        state.finished = true;
                        return Some((Err(CompletionError::Stream(payload)), state));
                    }
                }
            }

            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(bytes)) => {
                    let events = state.decoder.feed(&bytes);
                    state.pending.extend(events);
                }
                Some(Err(err)) => {
                    state.finished = true;
                    return Some((Err(err), state));
                }
                None => {
                    let events = state.decoder.finish();
                    state.pending.extend(events);
                    state.pending.push_back(SseEvent::Done);
                }
            }
        }
    })
    .boxed()
}

/// Streams completions from an OpenAI-compatible HTTP endpoint.
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCompletionClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn open(&self, request: ChatRequest) -> Result<FragmentStream, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            CompletionError::Authentication(
                "no API key configured (set GROQ_API_KEY or run 'vers3chat auth')".to_string(),
            )
        })?;

        let response = self
            .client
            .post(self.chat_url())
            .header("Content-Type", "application/json")
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| CompletionError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(CompletionError::from_status(status.as_u16(), body));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|err| CompletionError::Transport(err.to_string()))
            })
            .boxed();

        Ok(fragments_from_body(body))
    }
}
