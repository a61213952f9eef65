//! Backend router — selects the generation backend from configuration.
//!
//! Every supported engine speaks the OpenAI chat-completions dialect, so the
//! router only has to resolve a base URL, a key and a model.

use std::sync::Arc;
use std::time::Duration;
use tutorbot_config::TutorConfig;
use tutorbot_core::backend::GenerationBackend;

use crate::openai_compat::OpenAiCompatBackend;

/// Build the configured backend.
pub fn build_from_config(config: &TutorConfig) -> Arc<dyn GenerationBackend> {
    let backend = &config.backend;
    let base_url = backend
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&backend.provider));
    let api_key = backend.api_key.clone().unwrap_or_default();

    tracing::debug!(
        provider = %backend.provider,
        base_url = %base_url,
        model = %backend.model,
        "Building generation backend"
    );

    Arc::new(OpenAiCompatBackend::with_timeout(
        &backend.provider,
        base_url,
        api_key,
        &backend.model,
        Duration::from_secs(backend.timeout_secs),
    ))
}

/// Whether the provider needs an API key to be usable.
pub fn requires_api_key(provider_name: &str) -> bool {
    !matches!(
        provider_name,
        "ollama" | "vllm" | "llamacpp" | "llama.cpp" | "lmstudio"
    )
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        "lmstudio" => "http://localhost:1234/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").contains("openrouter.ai"));
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }

    #[test]
    fn build_from_default_config() {
        let config = TutorConfig::default();
        let backend = build_from_config(&config);
        assert_eq!(backend.name(), "ollama");
    }

    #[test]
    fn local_engines_need_no_key() {
        assert!(!requires_api_key("ollama"));
        assert!(!requires_api_key("llamacpp"));
        assert!(requires_api_key("openai"));
    }
}
