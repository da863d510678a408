/// Client-specific result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from the Atelier client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configured backend endpoint is unusable
    #[error("invalid backend configuration: {0}")]
    Config(String),

    /// Backend returned an error response
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
    },

    /// Failed to parse a success response
    #[error("failed to parse backend response: {0}")]
    Parse(String),

    /// The request never completed
    #[error("could not reach the backend: {0}")]
    Transport(String),
}
