//! Scripted completion client for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::stream;
use futures_util::StreamExt;

use crate::api::ChatRequest;
use crate::core::chat_stream::{CompletionClient, FragmentStream};
use crate::core::error::CompletionError;

/// What the client does for one `open` call.
pub enum Script {
    Stream(Vec<Result<String, CompletionError>>),
    Reject(CompletionError),
}

/// Plays back one script per request and records every request it receives.
#[derive(Default)]
pub struct ScriptedClient {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(fragments: &[&str]) -> Self {
        Self::new(vec![Script::Stream(
            fragments.iter().map(|text| Ok(text.to_string())).collect(),
        )])
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn open(&self, request: ChatRequest) -> Result<FragmentStream, CompletionError> {
        self.requests.lock().unwrap().push(request);
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left");

        match script {
            Script::Stream(items) => Ok(stream::iter(items).boxed()),
            Script::Reject(err) => Err(err),
        }
    }
}
