use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use url::Url;

use crate::error::{ClientError, Result};

/// Canonical generate endpoint path appended to the base URL
const GENERATE_PATH: &str = "/api/generate";

/// Typed client for the Atelier generation proxy
///
/// Resolves and validates the backend base URL once at construction;
/// `generate` is then a single POST round trip with no retry, streaming,
/// or cancellation.
#[derive(Debug, Clone)]
pub struct AtelierClient {
    base_url: Url,
    http: reqwest::Client,
}

/// Wire shape of a successful proxy response
#[derive(Debug, Deserialize)]
struct GenerateReply {
    #[serde(default)]
    image: Option<String>,
    /// Legacy alias emitted by older proxy deployments
    #[serde(default, rename = "imageUrl")]
    image_url: Option<String>,
}

impl AtelierClient {
    /// Create a new client pointing at the given backend base URL
    ///
    /// Fails fast when the value is empty, not a parseable URL, or uses
    /// plain `http` for a non-loopback host. A trailing `/api/generate`
    /// (from pasting the full endpoint) is stripped so the path is not
    /// doubled.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` describing the problem.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Get the normalized base URL
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Generate an image for a prompt, returning its URL or data URI
    ///
    /// The caller pre-validates the prompt (non-empty, trimmed); the
    /// client forwards it as-is.
    ///
    /// # Errors
    ///
    /// `Transport` when the request never completes, `Api` for any error
    /// response or a success without an image, `Parse` when a success
    /// body is not the expected JSON.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint_url();

        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.contains("json"));

        // The body is read exactly once; error paths reuse the raw text
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if status.is_success() {
            if !is_json {
                return Err(ClientError::Parse(
                    "backend returned a non-JSON success response".to_owned(),
                ));
            }

            let reply: GenerateReply =
                serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))?;

            return reply
                .image
                .or(reply.image_url)
                .filter(|image| !image.is_empty())
                .ok_or_else(|| ClientError::Api {
                    status: status.as_u16(),
                    message: "backend response did not include an image".to_owned(),
                });
        }

        let parsed = is_json
            .then(|| serde_json::from_str::<serde_json::Value>(&body).ok())
            .flatten();

        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body, parsed.as_ref()),
        })
    }

    /// Full generate endpoint URL
    fn endpoint_url(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}{GENERATE_PATH}", self.base_url.path().trim_end_matches('/'));
        url.set_path(&path);
        url
    }
}

/// Validate and normalize a configured backend base URL
fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Config(
            "backend endpoint is not configured".to_owned(),
        ));
    }

    let mut url = Url::parse(trimmed)
        .map_err(|e| ClientError::Config(format!("backend endpoint is not a valid URL: {e}")))?;

    match url.scheme() {
        "https" => {}
        "http" if is_loopback(&url) => {}
        "http" => {
            return Err(ClientError::Config(
                "backend endpoint must use https (plain http is allowed only for loopback addresses)"
                    .to_owned(),
            ));
        }
        other => {
            return Err(ClientError::Config(format!(
                "unsupported backend URL scheme: {other}"
            )));
        }
    }

    // Re-entering the full endpoint must not double the path later
    let path = url.path().trim_end_matches('/');
    let path = path.strip_suffix(GENERATE_PATH).unwrap_or(path);
    let path = path.trim_end_matches('/').to_owned();
    url.set_path(&path);

    Ok(url)
}

/// Whether the URL points at a loopback host
fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(host)) => host.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Map an error response to the most useful message available
///
/// Structured `error`/`message` fields win; otherwise a status-specific
/// hint; otherwise the raw body text.
fn error_message(status: u16, body: &str, parsed: Option<&serde_json::Value>) -> String {
    if let Some(json) = parsed {
        let message = json["error"]
            .as_str()
            .or_else(|| json["error"]["message"].as_str())
            .or_else(|| json["message"].as_str());
        if let Some(message) = message {
            return message.to_owned();
        }
    }

    match status {
        404 => "backend endpoint not found (404); check that the configured base URL points at the generation proxy".to_owned(),
        401 | 403 => "backend rejected the credential (401/403); check the configured API key".to_owned(),
        _ if !body.trim().is_empty() => body.trim().to_owned(),
        _ => format!("backend returned HTTP {status}"),
    }
}
