#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod extract;
mod protocol;
mod server;
mod types;
mod upstream;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, extract::State, routing::post};

pub use error::{GenerateError, Result};
pub use extract::{ExtractError, extract_image};
pub use server::Server;
pub use types::{GenerateRequest, GenerateResponse};

/// Build the generation server from configuration
///
/// # Errors
///
/// Returns an error if the upstream credential is not configured
pub fn build_server(config: &atelier_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        Server::from_config(config)
            .map_err(|e| anyhow::anyhow!("failed to initialize generation server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for image generation
///
/// `POST /api/generate` runs a prompt; any other method on the path is a
/// 405. Preflight is short-circuited by the server's CORS middleware
/// before routing.
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/api/generate", post(generate))
}

/// Handle image generation requests
async fn generate(
    State(server): State<Arc<Server>>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "rejected generate request body");
        GenerateError::InvalidRequest(rejection.body_text())
    })?;

    let response = server.generate(&request).await?;

    Ok(Json(response))
}
