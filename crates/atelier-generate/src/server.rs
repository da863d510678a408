use atelier_config::Config;

use crate::error::{GenerateError, Result};
use crate::extract::extract_image;
use crate::types::{GenerateRequest, GenerateResponse};
use crate::upstream::UpstreamClient;

/// Generation server: validates the prompt, calls upstream, extracts
///
/// Stateless across requests; each call is a single upstream round trip.
pub struct Server {
    upstream: UpstreamClient,
}

impl Server {
    /// Create from configuration
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::Config` when the upstream credential is
    /// missing, so a misconfigured proxy fails at startup instead of on
    /// the first request.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            upstream: UpstreamClient::new(&config.upstream)?,
        })
    }

    /// Run one prompt through the full pipeline
    ///
    /// received → validated → upstream_called → parsed → extracted.
    /// Terminal in one response; no retries across states.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let prompt = request.prompt.trim();
        if prompt.is_empty() {
            return Err(GenerateError::InvalidRequest(
                "prompt must be a non-empty string".to_owned(),
            ));
        }

        let content = self.upstream.generate_text(prompt).await?;

        if content.is_empty() {
            tracing::warn!("upstream reply carried no text");
            return Err(GenerateError::NoContent);
        }

        let image = extract_image(&content).map_err(|e| {
            tracing::warn!(error = %e, "no image in upstream reply");
            GenerateError::from(e)
        })?;

        tracing::debug!(reply_chars = content.chars().count(), "image extracted");

        Ok(GenerateResponse { image })
    }
}
