//! `tutorbot init` — write the default configuration.

use tutorbot_config::TutorConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = TutorConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("TutorBot — Setup");
    println!("================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete it and re-run init.\n");
        return Ok(());
    }

    std::fs::write(&config_path, TutorConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\nNext steps:");
    println!("   1. Start a local engine (default: ollama) or set backend.provider");
    println!("   2. Run: tutorbot status");
    println!("   3. Run: tutorbot ask \"Why does my loop never stop?\" --file main.py\n");

    Ok(())
}
