//! Test utilities for budgetwise-core
//!
//! This module provides a mock Gemini server that speaks enough of the
//! `generateContent` API for backend and end-to-end tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// API key the mock server accepts
pub const MOCK_API_KEY: &str = "test-key";

/// How the mock server answers generation requests
#[derive(Clone)]
enum Behavior {
    Reply(String),
    QuotaExhausted,
}

struct MockState {
    behavior: Behavior,
    requests: Mutex<Vec<Value>>,
}

/// Mock Gemini server for testing and development
pub struct MockGeminiServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start a server that answers every generation request with `reply`
    pub async fn start(reply: &str) -> Self {
        Self::start_with(Behavior::Reply(reply.to_string())).await
    }

    /// Start a server that fails every generation request with HTTP 429
    pub async fn start_exhausted() -> Self {
        Self::start_with(Behavior::QuotaExhausted).await
    }

    async fn start_with(behavior: Behavior) -> Self {
        let state = Arc::new(MockState {
            behavior,
            requests: Mutex::new(Vec::new()),
        });

        // The action suffix (":generateContent") is part of the model segment
        let app = Router::new()
            .route("/v1beta/models/:model", get(handle_model).post(handle_generate))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.state
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(|k| k == MOCK_API_KEY)
        .unwrap_or(false)
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {"code": status.as_u16(), "message": message, "status": code}
        })),
    )
        .into_response()
}

/// Model metadata endpoint (health check)
async fn handle_model(Path(model): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return error_response(StatusCode::FORBIDDEN, "PERMISSION_DENIED", "API key not valid");
    }
    Json(json!({
        "name": format!("models/{}", model),
        "displayName": model,
        "outputTokenLimit": 8192
    }))
    .into_response()
}

/// generateContent endpoint
async fn handle_generate(
    State(state): State<Arc<MockState>>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !model_action.ends_with(":generateContent") {
        return error_response(StatusCode::NOT_FOUND, "NOT_FOUND", "unknown action");
    }
    if !authorized(&headers) {
        return error_response(StatusCode::FORBIDDEN, "PERMISSION_DENIED", "API key not valid");
    }
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(body);
    }

    match &state.behavior {
        Behavior::QuotaExhausted => error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "RESOURCE_EXHAUSTED",
            "Quota exceeded for generate_content requests",
        ),
        Behavior::Reply(text) => Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
    }
}
