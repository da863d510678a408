use serde::{Deserialize, Serialize};

/// Image generation request from the browser client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateRequest {
    /// Text description of the desired image
    pub prompt: String,
}

/// Successful generation response
///
/// `image` is an absolute `http(s)` URL or a `data:image/...;base64,...`
/// URI. Callers never see which upstream API shape produced it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateResponse {
    pub image: String,
}
