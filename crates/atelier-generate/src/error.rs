use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::extract::ExtractError;

pub type Result<T> = std::result::Result<T, GenerateError>;

/// Generation proxy errors with appropriate HTTP status codes
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Client sent a malformed body or a missing/blank prompt
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Server-side configuration is unusable (missing credential)
    #[error("server misconfigured: {0}")]
    Config(String),

    /// Upstream generation API returned a non-success status
    ///
    /// `message` is the best-effort extraction from the upstream error
    /// body; `status` is re-surfaced to the client unchanged.
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The upstream request never completed
    #[error("could not reach upstream: {0}")]
    Connection(String),

    /// Upstream returned success but the body was not the expected shape
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),

    /// Upstream succeeded but its reply carried no text at all
    #[error("model returned no content")]
    NoContent,

    /// Upstream replied with text but no image could be extracted
    #[error("no image in model reply: {excerpt}")]
    Extraction { excerpt: String },
}

impl From<ExtractError> for GenerateError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Empty => Self::NoContent,
            ExtractError::NoImage { excerpt } => Self::Extraction { excerpt },
        }
    }
}

impl GenerateError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::NoContent => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Connection(_) | Self::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            Self::Extraction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Message that is safe to surface to API consumers
    ///
    /// Upstream errors surface only the extracted message; the status is
    /// already carried by the response itself.
    pub fn client_message(&self) -> String {
        match self {
            Self::Upstream { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Flat error envelope: `{"error": "..."}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}
