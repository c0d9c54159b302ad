//! Test utilities for lumen-core
//!
//! A mock OpenAI-compatible chat-completion server for integration tests and
//! offline development. It answers every completion with a scripted mode and
//! records what it was sent.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// How the mock answers chat completions
#[derive(Debug, Clone)]
pub enum ServerMode {
    /// 200 with this text as `choices[0].message.content`
    Reply(String),
    /// Empty-bodied error with this status code
    Status(u16),
    /// 200 with a body that has no choices
    Malformed,
}

#[derive(Default)]
struct Recorded {
    count: usize,
    last_body: Option<Value>,
    last_authorization: Option<String>,
}

#[derive(Clone)]
struct MockState {
    mode: ServerMode,
    recorded: Arc<Mutex<Recorded>>,
}

/// Mock chat-completion server for testing and development
pub struct MockChatServer {
    addr: SocketAddr,
    recorded: Arc<Mutex<Recorded>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockChatServer {
    /// Start the mock server on an available port
    pub async fn start(mode: ServerMode) -> Self {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let state = MockState {
            mode,
            recorded: recorded.clone(),
        };

        let app = Router::new()
            .route("/v1/chat/completions", post(handle_completion))
            .route("/v1/models", get(handle_models))
            .with_state(state);

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
            recorded,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full chat-completions endpoint URL
    pub fn chat_url(&self) -> String {
        format!("{}/v1/chat/completions", self.url())
    }

    /// Completion requests received so far
    pub fn request_count(&self) -> usize {
        self.recorded.lock().unwrap().count
    }

    /// JSON body of the most recent completion request
    pub fn last_request(&self) -> Option<Value> {
        self.recorded.lock().unwrap().last_body.clone()
    }

    /// Authorization header of the most recent completion request
    pub fn last_authorization(&self) -> Option<String> {
        self.recorded.lock().unwrap().last_authorization.clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockChatServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_completion(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    {
        let mut recorded = state.recorded.lock().unwrap();
        recorded.count += 1;
        recorded.last_authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        recorded.last_body = Some(body.clone());
    }

    match state.mode {
        ServerMode::Reply(text) => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": body["model"],
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        ServerMode::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        ServerMode::Malformed => Json(json!({ "id": "chatcmpl-mock", "choices": [] })).into_response(),
    }
}

/// Model listing used by health checks
async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{ "id": "mixtral-8x7b-32768", "object": "model" }]
    }))
}
