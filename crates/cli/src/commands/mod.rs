pub mod ask;
pub mod grade;
pub mod init;
pub mod input;
pub mod runner;
pub mod status;
pub mod validate;

use std::sync::Arc;
use tutorbot_config::TutorConfig;
use tutorbot_core::readiness::EngineStatus;
use tutorbot_tutor::TutorBot;

/// Load config, build the backend and bring the engine up.
///
/// Fails early with the engine status when the backend cannot be reached, so
/// the tutoring commands never send a request to a cold engine.
pub async fn ready_tutor(config: &TutorConfig) -> Result<TutorBot, Box<dyn std::error::Error>> {
    if tutorbot_providers::router::requires_api_key(&config.backend.provider)
        && config.backend.api_key.is_none()
    {
        tracing::warn!(
            provider = %config.backend.provider,
            "No API key configured; set TUTORBOT_API_KEY or backend.api_key"
        );
    }

    let backend = tutorbot_providers::build_from_config(config);
    let tutor = TutorBot::from_config(config, Arc::clone(&backend));

    match tutor.initialize().await {
        EngineStatus::Ready => Ok(tutor),
        status => Err(format!(
            "Generation engine '{}' is not ready ({status}). Run `tutorbot status` for details.",
            backend.name()
        )
        .into()),
    }
}

pub fn load_config() -> Result<TutorConfig, Box<dyn std::error::Error>> {
    Ok(TutorConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Print a verdict as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
