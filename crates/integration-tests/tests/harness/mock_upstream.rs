//! Mock upstream generation API for integration tests
//!
//! Implements a minimal Google `generateContent` endpoint that returns
//! canned plain-text replies

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Default canned reply when no custom content is configured
const DEFAULT_REPLY: &str = "Here is your image: ![result](https://images.example/mock.png)";

/// Mock upstream backend that returns predictable replies
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockUpstreamState>,
}

struct MockUpstreamState {
    request_count: AtomicU32,
    /// Prompt text seen in the most recent request
    last_prompt: Mutex<Option<String>>,
    /// When set, every request fails with this status
    fail_status: Option<u16>,
    /// Reply text (`None` means an empty candidate list)
    response_content: Option<String>,
}

impl MockUpstream {
    /// Start a mock that replies with a markdown image link
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(None, Some(DEFAULT_REPLY.to_owned())).await
    }

    /// Start a mock that replies with the given text
    pub async fn start_with_response(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(None, Some(content.to_owned())).await
    }

    /// Start a mock that fails every request with the given status
    pub async fn start_failing(status: u16) -> anyhow::Result<Self> {
        Self::start_inner(Some(status), None).await
    }

    /// Start a mock that replies 200 with no candidates at all
    pub async fn start_empty() -> anyhow::Result<Self> {
        Self::start_inner(None, None).await
    }

    async fn start_inner(
        fail_status: Option<u16>,
        response_content: Option<String>,
    ) -> anyhow::Result<Self> {
        let state = Arc::new(MockUpstreamState {
            request_count: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
            fail_status,
            response_content,
        });

        let app = Router::new()
            .route(
                "/v1beta/models/{model_call}",
                routing::post(handle_generate_content),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the upstream
    ///
    /// Includes `/v1beta` since the proxy appends `/models/{model}:generateContent`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Number of generation requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Prompt text from the most recent request
    pub fn last_prompt(&self) -> Option<String> {
        self.state.last_prompt.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Wire types matching the Google generateContent format --

#[derive(Debug, Deserialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[allow(dead_code)]
    #[serde(rename = "generationConfig")]
    generation_config: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[allow(dead_code)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

// -- Handler --

async fn handle_generate_content(
    State(state): State<Arc<MockUpstreamState>>,
    Json(request): Json<GenerateContentRequest>,
) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let prompt = request
        .contents
        .first()
        .and_then(|content| content.parts.first())
        .and_then(|part| part.text.clone());
    *state.last_prompt.lock().unwrap() = prompt;

    if let Some(status) = state.fail_status {
        return (
            StatusCode::from_u16(status).expect("valid test status"),
            Json(serde_json::json!({
                "error": {
                    "code": status,
                    "message": "mock upstream intentional failure",
                    "status": "INTERNAL"
                }
            })),
        )
            .into_response();
    }

    let candidates = state.response_content.as_ref().map_or_else(
        || serde_json::json!([]),
        |content| {
            serde_json::json!([{
                "content": {
                    "role": "model",
                    "parts": [{"text": content}]
                },
                "finishReason": "STOP"
            }])
        },
    );

    Json(serde_json::json!({ "candidates": candidates })).into_response()
}
