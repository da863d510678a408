//! Upstream call to the Google Generative Language API

use atelier_config::UpstreamConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::{GenerateError, Result};
use crate::protocol::{GenerateContentRequest, GenerateContentResponse};

/// Maximum number of raw upstream error body characters echoed to clients
const ERROR_EXCERPT_CHARS: usize = 200;

/// Authenticated client for the `generateContent` endpoint
#[derive(Debug)]
pub(crate) struct UpstreamClient {
    client: Client,
    base_url: Url,
    model: String,
    api_key: SecretString,
}

impl UpstreamClient {
    /// Create from upstream configuration
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::Config` if no API key is configured; the
    /// proxy never proceeds with an unauthenticated upstream call.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| {
                GenerateError::Config("upstream API key is not configured".to_owned())
            })?;

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url(),
            model: config.model().to_owned(),
            api_key,
        })
    }

    /// Build the `generateContent` endpoint URL for the configured model
    fn generate_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/models/{model}:generateContent", model = self.model)
    }

    /// Send the prompt upstream and return the joined reply text
    ///
    /// One POST, no retry, no timeout beyond the transport's own; a hung
    /// upstream call hangs the caller.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        let wire_request = GenerateContentRequest::single_turn(prompt);
        let url = self.generate_url();

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = %self.model, error = %e, "upstream request failed");
                GenerateError::Connection(e.to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.model, %status, "upstream returned error");
            return Err(GenerateError::Upstream {
                status: status.as_u16(),
                message: upstream_error_message(status.as_u16(), &body),
            });
        }

        let wire_response: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!(model = %self.model, error = %e, "failed to parse upstream response");
            GenerateError::InvalidResponse(e.to_string())
        })?;

        Ok(wire_response.text())
    }
}

/// Best-effort message from an upstream error body
///
/// Prefers the structured `error.message` (Google shape) or a top-level
/// `message`; falls back to a truncated raw excerpt.
fn upstream_error_message(status: u16, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let message = json["error"]["message"]
            .as_str()
            .or_else(|| json["message"].as_str());
        if let Some(message) = message {
            return message.to_owned();
        }
    }

    let excerpt: String = body.chars().take(ERROR_EXCERPT_CHARS).collect();
    format!("upstream returned {status}: {excerpt}")
}
