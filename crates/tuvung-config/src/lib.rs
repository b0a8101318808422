use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::fallback::FallbackConfig;
use self::openai::OpenAiConfig;
use self::retry::RetryConfig;
use self::store::StoreConfig;
use self::tutor::TutorConfig;

pub mod fallback;
pub mod openai;
pub mod retry;
pub mod store;
pub mod tutor;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the lookup pipeline needs, resolved once at startup and handed
/// to each component by value.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub fallback: FallbackConfig,
    pub retry: RetryConfig,
    pub store: StoreConfig,
    pub tutor: TutorConfig,
}

impl Config {
    /// Defaults overridden by process environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the known keys
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        config.apply_vars(lookup);
        config
    }

    /// Read a JSON config file; missing sections fall back to defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// Overlay environment-style variables on top of the current values
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            self.openai.api_key = api_key;
        }

        if let Some(api_url) = lookup("OPENAI_API_URL") {
            self.openai.api_url = api_url;
        }

        if let Some(model) = lookup("OPENAI_MODEL") {
            self.openai.model = model;
        }

        if let Some(temperature) = lookup("OPENAI_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.openai.temperature = temperature;
        }

        if let Some(max_tokens) = lookup("OPENAI_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.openai.max_tokens = max_tokens;
        }

        if let Some(max_attempts) = lookup("TUVUNG_MAX_RETRIES").and_then(|v| v.parse().ok()) {
            self.retry.max_attempts = max_attempts;
        }

        if let Some(enabled) = lookup("TUVUNG_FALLBACK_ENABLED").and_then(|v| v.parse().ok()) {
            self.fallback.enabled = enabled;
        }

        if let Some(path) = lookup("TUVUNG_VOCAB_FILE") {
            self.store.path = path;
        }
    }
}
