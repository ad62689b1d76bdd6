//! Test utilities for pennywise-core
//!
//! This module provides a mock chat-completions server so the real HTTP
//! backend can be exercised in tests without network access.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Analysis returned by the default scripted reply
pub const MOCK_SERVER_ANALYSIS: &str = "Your income comfortably covers your expenses this period.";

/// Quote returned by the default scripted reply
pub const MOCK_SERVER_QUOTE: &str =
    "Small, steady deposits grow into the freedom to choose how you spend your time.";

/// How the mock server answers chat-completion requests
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Well-formed analysis JSON or a quote, depending on the prompt
    Default,
    /// Return this text as the assistant message content
    Content(String),
    /// Respond with this HTTP status and no completion
    Status(u16),
    /// Sleep before answering with the default reply
    Delay(Duration),
}

/// A chat-completion request as received by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub body: Value,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct ServerState {
    reply: MockReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Mock OpenAI-compatible server for testing and development
pub struct MockCompletionServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockCompletionServer {
    /// Start the mock server on an available port with default replies
    pub async fn start() -> Self {
        Self::start_with(MockReply::Default).await
    }

    /// Start the mock server with a scripted reply
    pub async fn start_with(reply: MockReply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            reply,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat_completion))
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
            shutdown_tx: Some(shutdown_tx),
            requests,
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockCompletionServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Models endpoint (health check)
async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "gpt-test", "object": "model"}]
    }))
}

async fn handle_chat_completion(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state.requests.lock().unwrap().push(RecordedRequest {
        body: body.clone(),
        authorization,
    });

    let content = match state.reply {
        MockReply::Default => default_content(&body),
        MockReply::Content(ref text) => text.clone(),
        MockReply::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, "mock completion failure").into_response();
        }
        MockReply::Delay(delay) => {
            tokio::time::sleep(delay).await;
            default_content(&body)
        }
    };

    let model = body["model"].as_str().unwrap_or("gpt-test").to_string();
    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

/// Pick a reply by looking at the system message
fn default_content(body: &Value) -> String {
    let system = body["messages"]
        .as_array()
        .and_then(|messages| messages.iter().find(|m| m["role"] == "system"))
        .and_then(|m| m["content"].as_str())
        .unwrap_or_default();

    if system.contains("financial wisdom") {
        format!("\"{}\"", MOCK_SERVER_QUOTE)
    } else {
        let analysis = json!({
            "analysis": MOCK_SERVER_ANALYSIS,
            "recommendations": [
                "Move a fixed amount to savings each payday",
                "Set a monthly cap for dining out",
                "Review recurring charges every quarter",
                "Build a three-month emergency fund"
            ],
            "insights": [
                "You spend less than you earn",
                "Your largest costs are essentials",
                "You log transactions regularly"
            ]
        });
        format!("Here is the analysis:\n{}", analysis)
    }
}
