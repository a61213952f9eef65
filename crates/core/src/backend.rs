//! Generation backend trait — the abstraction over text-generation engines.
//!
//! A backend knows how to turn an ordered list of role-tagged messages plus
//! sampling parameters into a completion. The rest of the pipeline only ever
//! reads the completion's text, so any engine (a local server, a hosted API,
//! a scripted test double) can sit behind it.

use crate::error::BackendError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Ordered messages: the system prompt first, then the user prompt
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A complete reply from a backend.
///
/// Parsers only look at [`GenerationReply::text`]; usage and model are kept
/// for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReply {
    /// The generated text
    text: String,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    /// Which model actually responded
    #[serde(default)]
    pub model: String,
}

impl GenerationReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
            model: String::new(),
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The completion text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// The core backend trait.
///
/// The orchestrator calls `generate()` without knowing which engine is
/// behind it.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "ollama", "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete reply.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationReply, BackendError>;

    /// Health check — is the engine loaded and reachable?
    ///
    /// Used by [`crate::EngineState::initialize`].
    async fn health_check(&self) -> std::result::Result<bool, BackendError> {
        Ok(true)
    }
}
