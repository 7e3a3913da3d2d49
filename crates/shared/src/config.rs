use std::env;

use thiserror::Error;

use crate::config_env::{optional_trimmed_env, parse_u64_env};

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub gemini: GeminiConfig,
}

/// Settings for the upstream generateContent endpoint.
///
/// The API key is optional on purpose: the server starts without one and
/// each request that needs the upstream fails with `MissingApiKey` instead.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build gemini http client: {0}")]
    HttpClient(String),
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env::var("API_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            gemini: GeminiConfig::from_env()?,
        })
    }
}

impl GeminiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = optional_trimmed_env("GEMINI_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidConfiguration(
                "GEMINI_API_BASE_URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(Self {
            api_key: optional_trimmed_env("GOOGLE_API_KEY")
                .or_else(|| optional_trimmed_env("GEMINI_API_KEY")),
            model: optional_trimmed_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            api_base_url,
            timeout_ms: parse_u64_env("GEMINI_TIMEOUT_MS", DEFAULT_GEMINI_TIMEOUT_MS)?,
        })
    }
}
