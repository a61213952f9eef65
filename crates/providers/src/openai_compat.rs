//! OpenAI-compatible generation backend.
//!
//! Works with: Ollama, llama.cpp server, vLLM, OpenAI, OpenRouter, and any
//! endpoint exposing `/v1/chat/completions`.
//!
//! Only non-streaming chat completions are used; `health_check` queries
//! `/models` so the engine can report readiness before the first request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use tutorbot_core::backend::{GenerationBackend, GenerationReply, GenerationRequest, Usage};
use tutorbot_core::error::BackendError;
use tutorbot_core::message::Message;

/// An OpenAI-compatible generation backend.
pub struct OpenAiCompatBackend {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiCompatBackend {
    /// Create a new OpenAI-compatible backend.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::with_timeout(name, base_url, api_key, model, Duration::from_secs(120))
    }

    pub fn with_timeout(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        }
    }

    /// Create an Ollama backend (convenience constructor).
    pub fn ollama(base_url: Option<&str>, model: impl Into<String>) -> Self {
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "ollama", // Ollama doesn't need a real key
            model,
        )
    }

    /// Create an OpenAI backend (convenience constructor).
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert our Message types to OpenAI API format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str().into(),
                content: Some(m.content.clone()),
            })
            .collect()
    }

    fn request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false,
        })
    }

    fn map_send_error(e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(e.to_string())
        } else {
            BackendError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiCompatBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationReply, BackendError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(&request);

        debug!(backend = %self.name, model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(BackendError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(BackendError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Backend returned error");
            return Err(BackendError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| BackendError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::EmptyReply("No choices in response".into()))?;

        let mut reply = GenerationReply::new(choice.message.content.unwrap_or_default())
            .with_model(api_response.model);

        if let Some(u) = api_response.usage {
            reply = reply.with_usage(Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            });
        }

        Ok(reply)
    }

    async fn health_check(&self) -> std::result::Result<bool, BackendError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(Self::map_send_error)?;

        Ok(response.status().is_success())
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
