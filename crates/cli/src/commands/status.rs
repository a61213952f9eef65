//! `tutorbot status` — initialize the engine and report its status.

use std::sync::Arc;
use tutorbot_config::TutorConfig;
use tutorbot_core::readiness::EngineStatus;
use tutorbot_tutor::TutorBot;

use super::{load_config, print_json};

pub async fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let backend = tutorbot_providers::build_from_config(&config);
    let tutor = TutorBot::from_config(&config, Arc::clone(&backend));

    let status = tutor.initialize().await;

    if json {
        return print_json(&status);
    }

    println!("TutorBot Status");
    println!("===============");
    println!("  Config dir:   {}", TutorConfig::config_dir().display());
    println!("  Provider:     {}", config.backend.provider);
    println!("  Model:        {}", config.backend.model);
    println!(
        "  Endpoint:     {}",
        config
            .backend
            .api_url
            .clone()
            .unwrap_or_else(|| tutorbot_providers::router::default_base_url(&config.backend.provider))
    );
    println!(
        "  Sampling:     ask {}/{} · grade {}/{} · validate {}/{}",
        config.sampling.ask.temperature,
        config.sampling.ask.max_tokens,
        config.sampling.grade.temperature,
        config.sampling.grade.max_tokens,
        config.sampling.validate.temperature,
        config.sampling.validate.max_tokens,
    );

    match &status {
        EngineStatus::Ready => println!("\n  ✅ Engine: {status}"),
        _ => println!("\n  ❌ Engine: {status}"),
    }

    if !TutorConfig::config_dir().join("config.toml").exists() {
        println!("  ⚠️  No config file — run `tutorbot init` first");
    }

    Ok(())
}
