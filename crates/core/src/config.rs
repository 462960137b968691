// crates/core/src/config.rs
//! Process configuration.
//!
//! Loaded once at startup via [`Config::from_env`] and passed explicitly into
//! each client constructor. Nothing reads the environment after startup, so
//! components stay testable with hand-built configurations.

use thiserror::Error;

/// Default listen port (kept from the original deployment).
pub const DEFAULT_PORT: u16 = 5000;

/// Default chat model for the text classifier.
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";

/// Default base URL for the text-classifier provider.
pub const DEFAULT_TEXT_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The image classifier is mandatory; refuse to start without it.
    #[error("PREDICTION_URL and PREDICTION_KEY must be set")]
    MissingVisionCredentials,
}

/// Upstream endpoint + credential for the binary image classifier.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Full prediction endpoint URL (includes project + iteration path).
    pub endpoint: String,
    /// Value for the `Prediction-Key` header.
    pub key: String,
}

/// Credentials for the language-model text classifier.
///
/// The whole struct is optional at the [`Config`] level: when the operator
/// has not provided an API key, the text path is disabled and the server
/// answers 503 on it.
#[derive(Debug, Clone)]
pub struct TextClassifierConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Immutable process-wide configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub vision: VisionConfig,
    pub text: Option<TextClassifierConfig>,
    pub port: u16,
    /// SQLite database file path.
    pub database_path: String,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// Fails only when the mandatory image-classifier credentials are
    /// missing; the text classifier is optional and silently disabled when
    /// `OPENAI_API_KEY` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = std::env::var("PREDICTION_URL").ok().filter(|v| !v.is_empty());
        let key = std::env::var("PREDICTION_KEY").ok().filter(|v| !v.is_empty());

        let vision = match (endpoint, key) {
            (Some(endpoint), Some(key)) => VisionConfig { endpoint, key },
            _ => return Err(ConfigError::MissingVisionCredentials),
        };

        let text = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|api_key| TextClassifierConfig {
                api_key,
                base_url: std::env::var("OPENAI_BASE_URL")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_TEXT_BASE_URL.to_string()),
                model: std::env::var("OPENAI_MODEL")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            });

        let port = std::env::var("SORTCYCLE_PORT")
            .ok()
            .or_else(|| std::env::var("PORT").ok())
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_path = std::env::var("DATABASE_PATH")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "sortcycle.db".to_string());

        Ok(Self {
            vision,
            text,
            port,
            database_path,
        })
    }
}
