//! Configuration loading, validation, and management for TutorBot.
//!
//! Loads configuration from `~/.tutorbot/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! Every value has a default, so an absent file (or an absent section) yields
//! the stock tutoring behaviour: temperature 0.1 in all modes, reply caps of
//! 330/280/150 tokens, and the per-section context budgets below.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.tutorbot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Generation backend connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Per-mode sampling parameters
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Per-section context budgets, in tokens
    #[serde(default)]
    pub budgets: BudgetConfig,

    /// Code runner used by `tutorbot validate`
    #[serde(default)]
    pub runner: RunnerConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Well-known provider name ("ollama", "openai", "openrouter", "llamacpp", ...)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// HTTP client timeout for a single generation call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "ollama".into()
}
fn default_model() -> String {
    "qwen2.5-coder:1.5b".into()
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_url: None,
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Sampling parameters for one mode. Both keys are required when a
/// `[sampling.<mode>]` table is present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeSampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_ask_sampling")]
    pub ask: ModeSampling,

    #[serde(default = "default_grade_sampling")]
    pub grade: ModeSampling,

    #[serde(default = "default_validate_sampling")]
    pub validate: ModeSampling,
}

// Low temperature everywhere keeps the model on the requested reply format.
fn default_ask_sampling() -> ModeSampling {
    ModeSampling {
        temperature: 0.1,
        max_tokens: 330,
    }
}
fn default_grade_sampling() -> ModeSampling {
    ModeSampling {
        temperature: 0.1,
        max_tokens: 280,
    }
}
fn default_validate_sampling() -> ModeSampling {
    ModeSampling {
        temperature: 0.1,
        max_tokens: 150,
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            ask: default_ask_sampling(),
            grade: default_grade_sampling(),
            validate: default_validate_sampling(),
        }
    }
}

/// Token budgets for every context section. 1 token ≈ 4 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// The student's own question (ask mode)
    pub question: usize,
    /// Error message of the last run (ask mode)
    pub error_message: usize,
    /// Standard error of the last run (ask mode)
    pub stderr: usize,
    /// Each code file (ask mode)
    pub question_code: usize,
    /// Standard output of a successful run (ask mode)
    pub question_output: usize,
    pub question_assignment: usize,
    pub grade_assignment: usize,
    pub grade_code: usize,
    pub validate_assignment: usize,
    /// Standard output of the last run (validate mode)
    pub validate_output: usize,
    /// Error fallback when there is no output (validate mode)
    pub validate_error: usize,
    /// Each code file (validate mode)
    pub validate_code: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            question: 500,
            error_message: 800,
            stderr: 600,
            question_code: 1500,
            question_output: 600,
            question_assignment: 1200,
            grade_assignment: 1000,
            grade_code: 2000,
            validate_assignment: 1500,
            validate_output: 900,
            validate_error: 500,
            validate_code: 2000,
        }
    }
}

impl BudgetConfig {
    fn entries(&self) -> [(&'static str, usize); 12] {
        [
            ("question", self.question),
            ("error_message", self.error_message),
            ("stderr", self.stderr),
            ("question_code", self.question_code),
            ("question_output", self.question_output),
            ("question_assignment", self.question_assignment),
            ("grade_assignment", self.grade_assignment),
            ("grade_code", self.grade_code),
            ("validate_assignment", self.validate_assignment),
            ("validate_output", self.validate_output),
            ("validate_error", self.validate_error),
            ("validate_code", self.validate_code),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Kill the student program after this many seconds
    #[serde(default = "default_runner_timeout")]
    pub timeout_secs: u64,

    /// Language id → interpreter command line. The source is piped to stdin.
    #[serde(default = "default_interpreters")]
    pub interpreters: HashMap<String, String>,
}

fn default_runner_timeout() -> u64 {
    10
}

fn default_interpreters() -> HashMap<String, String> {
    HashMap::from([
        ("python".to_string(), "python3 -".to_string()),
        ("javascript".to_string(), "node".to_string()),
        ("ruby".to_string(), "ruby".to_string()),
        ("shell".to_string(), "sh".to_string()),
    ])
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_runner_timeout(),
            interpreters: default_interpreters(),
        }
    }
}

impl TutorConfig {
    /// Load configuration from the default path (~/.tutorbot/config.toml).
    ///
    /// Also checks environment variables:
    /// - `TUTORBOT_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `TUTORBOT_PROVIDER`, `TUTORBOT_MODEL`, `TUTORBOT_API_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if self.backend.api_key.is_none() {
            self.backend.api_key = var("TUTORBOT_API_KEY").or_else(|| var("OPENAI_API_KEY"));
        }
        if let Some(provider) = var("TUTORBOT_PROVIDER") {
            self.backend.provider = provider;
        }
        if let Some(model) = var("TUTORBOT_MODEL") {
            self.backend.model = model;
        }
        if let Some(url) = var("TUTORBOT_API_URL") {
            self.backend.api_url = Some(url);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".tutorbot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (mode, sampling) in [
            ("ask", &self.sampling.ask),
            ("grade", &self.sampling.grade),
            ("validate", &self.sampling.validate),
        ] {
            if !(0.0..=2.0).contains(&sampling.temperature) {
                return Err(ConfigError::ValidationError(format!(
                    "sampling.{mode}.temperature must be between 0.0 and 2.0"
                )));
            }
            if sampling.max_tokens == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "sampling.{mode}.max_tokens must be > 0"
                )));
            }
        }

        if let Some((name, _)) = self.budgets.entries().into_iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::ValidationError(format!(
                "budgets.{name} must be > 0"
            )));
        }

        if self.runner.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "runner.timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `tutorbot init`).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
