use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default Google Generative Language API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generation model
pub const DEFAULT_MODEL: &str = "gemini-3-pro-image-preview";

/// Upstream generation API configuration
///
/// The API key has no default and must be provided; base URL and model
/// fall back to fixed defaults when omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model identifier override
    #[serde(default)]
    pub model: Option<String>,
    /// API key sent as `x-goog-api-key`
    #[serde(default)]
    pub api_key: Option<SecretString>,
}

impl UpstreamConfig {
    /// Effective base URL
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never happen).
    pub fn base_url(&self) -> Url {
        self.base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"))
    }

    /// Effective model identifier
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}
