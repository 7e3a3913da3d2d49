use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::{ConfigError, GeminiConfig};
use crate::sessions::{ChatSessionState, ChatTurn};

use super::response::{extract_retry_after_seconds, parse_generation};
use super::GenerationResult;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("missing Gemini API key; set GOOGLE_API_KEY or GEMINI_API_KEY")]
    MissingApiKey,
    #[error("rate limit or quota exceeded")]
    RateLimited { retry_after_seconds: Option<u64> },
    #[error("generate request failed with status {status}")]
    UpstreamStatus { status: u16 },
    #[error("generate request timed out")]
    Timeout,
    #[error("generate request could not be completed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("generate response was not valid JSON: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

/// Client for the generateContent endpoint.
///
/// First answers try web-grounded generation and fall back once without
/// tools when the grounded call fails with anything other than a rate
/// limit. Follow-ups replay whatever mode the session settled on.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

struct GenerateCallOutcome {
    status: StatusCode,
    body: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;

        Ok(Self { client, config })
    }

    pub async fn generate_first_answer(
        &self,
        query: &str,
        session: &mut ChatSessionState,
    ) -> Result<GenerationResult, GeminiError> {
        let api_key = self.require_api_key()?;
        session.add_user_message(query);

        // Prefer grounded generation via the provider's search tool.
        let with_tools = self
            .call_generate_content(api_key, session.history(), true)
            .await?;
        if !with_tools.status.is_success() {
            if with_tools.status == StatusCode::TOO_MANY_REQUESTS {
                return Err(rate_limited(&with_tools.body));
            }

            // The grounded call can fail on models or keys without tool
            // access; retry the same history without tools.
            let without_tools = self
                .call_generate_content(api_key, session.history(), false)
                .await?;
            if without_tools.status == StatusCode::TOO_MANY_REQUESTS {
                return Err(rate_limited(&without_tools.body));
            }
            if !without_tools.status.is_success() {
                return Err(GeminiError::UpstreamStatus {
                    status: without_tools.status.as_u16(),
                });
            }

            session.set_tools_enabled(false);
            let parsed = parse_generation(&without_tools.body).map_err(GeminiError::InvalidPayload)?;
            session.add_model_message(parsed.text.as_str());
            return Ok(parsed);
        }

        session.set_tools_enabled(true);
        let parsed = parse_generation(&with_tools.body).map_err(GeminiError::InvalidPayload)?;
        session.add_model_message(parsed.text.as_str());
        Ok(parsed)
    }

    pub async fn generate_follow_up(
        &self,
        query: &str,
        session: &mut ChatSessionState,
    ) -> Result<GenerationResult, GeminiError> {
        let api_key = self.require_api_key()?;
        session.add_user_message(query);

        let with_tools = session.tools_enabled();
        let outcome = self
            .call_generate_content(api_key, session.history(), with_tools)
            .await?;
        if outcome.status == StatusCode::TOO_MANY_REQUESTS {
            return Err(rate_limited(&outcome.body));
        }
        if !outcome.status.is_success() {
            return Err(GeminiError::UpstreamStatus {
                status: outcome.status.as_u16(),
            });
        }

        let parsed = parse_generation(&outcome.body).map_err(GeminiError::InvalidPayload)?;
        session.add_model_message(parsed.text.as_str());
        Ok(parsed)
    }

    fn require_api_key(&self) -> Result<&str, GeminiError> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(GeminiError::MissingApiKey)
    }

    async fn call_generate_content(
        &self,
        api_key: &str,
        history: &[ChatTurn],
        with_tools: bool,
    ) -> Result<GenerateCallOutcome, GeminiError> {
        let contents: Vec<Value> = history
            .iter()
            .map(|turn| {
                json!({
                    "role": turn.role.as_str(),
                    "parts": [{ "text": turn.text }],
                })
            })
            .collect();

        let mut request_body = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": 0.9,
                "topP": 1,
                "topK": 1,
                "maxOutputTokens": 2048,
            },
        });
        if with_tools {
            request_body["tools"] = json!([{ "google_search": {} }]);
        }

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url, self.config.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GeminiError::Timeout
                } else {
                    GeminiError::Transport(err)
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(GeminiError::Transport)?;

        Ok(GenerateCallOutcome { status, body })
    }
}

fn rate_limited(body: &str) -> GeminiError {
    GeminiError::RateLimited {
        retry_after_seconds: extract_retry_after_seconds(body),
    }
}
