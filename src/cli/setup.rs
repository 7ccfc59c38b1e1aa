//! Session bootstrap shared by the interactive and one-shot commands.

use std::error::Error;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::budget;
use crate::core::chat_stream::HttpCompletionClient;
use crate::core::config::Config;
use crate::core::credentials::{resolve_api_key, resolve_base_url};
use crate::core::models::ModelRegistry;
use crate::core::orchestrator::ChatOrchestrator;
use crate::core::sentiment::SentimentClassifier;
use crate::core::session::SessionState;

pub struct ChatSetup {
    pub registry: &'static ModelRegistry,
    pub session: SessionState,
    pub orchestrator: ChatOrchestrator,
    /// Startup warnings to show once the UI is up.
    pub warnings: Vec<String>,
}

impl ChatSetup {
    pub fn resolve(
        config: &Config,
        model: Option<&str>,
        max_tokens: Option<u32>,
        plain: bool,
        env_only: bool,
    ) -> Result<Self, Box<dyn Error>> {
        let registry = ModelRegistry::builtin();
        let mut session = SessionState::new();
        let mut warnings = Vec::new();

        let model_id = model
            .or(config.default_model.as_deref())
            .unwrap_or(&registry.default_model().id)
            .to_string();
        session.select_model(registry, &model_id)?;

        if let Some(requested) = max_tokens.or(config.max_tokens) {
            warnings.extend(apply_max_tokens(&mut session, requested));
        }

        let api_key = resolve_api_key(env_only)?;
        if api_key.is_none() {
            warn!("no API key found; requests will fail authentication");
        }
        let base_url = resolve_base_url(config);
        debug!(%base_url, model = %model_id, "chat session ready");

        let client = Arc::new(HttpCompletionClient::new(base_url, api_key));
        let mut orchestrator = ChatOrchestrator::new(client);
        if !plain && config.emotion_enabled() {
            orchestrator = orchestrator.with_emotion(SentimentClassifier::default());
        }

        Ok(Self {
            registry,
            session,
            orchestrator,
            warnings,
        })
    }
}

/// Applies a user-supplied budget through the input-layer clamp. Returns a
/// warning when the value had to be adjusted.
fn apply_max_tokens(session: &mut SessionState, requested: u32) -> Option<String> {
    let model = session.selected_model()?.clone();
    let clamped = budget::clamp(requested, &model);
    // clamp keeps the value inside the model's range, so this cannot fail
    session.set_max_tokens(clamped).ok()?;

    (clamped != requested).then(|| {
        format!(
            "Max tokens {requested} adjusted to {clamped} (range {}..={} in steps of {} for {})",
            budget::MIN_MAX_TOKENS,
            model.max_tokens,
            budget::MAX_TOKENS_STEP,
            model.id
        )
    })
}
