//! Mock Responses API server for integration tests
//!
//! Serves one scripted reply for every `POST /v1/responses` and records the
//! request bodies and headers it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Reply the mock sends for every request
#[derive(Debug, Clone)]
pub enum Reply {
    /// JSON body with status 200
    Json(Value),
    /// Raw server-sent event stream
    Sse(String),
    /// Event stream body sent with a non-SSE content type
    Mislabelled(String),
    /// Error status with a raw body
    Status(StatusCode, String),
}

/// Request captured by the mock
#[derive(Debug, Clone)]
pub struct Captured {
    pub body: Value,
    pub headers: HeaderMap,
}

/// Mock Responses API backend
pub struct MockResponses {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    reply: Reply,
    requests: Mutex<Vec<Captured>>,
}

impl MockResponses {
    /// Start the mock server, returning immediately
    pub async fn start(reply: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            reply,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/responses", routing::post(handle_responses))
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

    /// Base URL for configuring the adapter
    ///
    /// Includes `/v1` since the model appends `/responses`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<Captured> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Body of the only request received
    pub fn single_body(&self) -> Value {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].body.clone()
    }
}

impl Drop for MockResponses {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_responses(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.requests.lock().unwrap().push(Captured { body, headers });

    match &state.reply {
        Reply::Json(value) => Json(value.clone()).into_response(),
        Reply::Sse(stream) => ([(header::CONTENT_TYPE, "text/event-stream")], stream.clone()).into_response(),
        Reply::Mislabelled(stream) => ([(header::CONTENT_TYPE, "application/json")], stream.clone()).into_response(),
        Reply::Status(status, text) => (*status, text.clone()).into_response(),
    }
}

/// Encode events as an SSE body, one `event:`/`data:` pair per event
pub fn sse(events: &[Value]) -> String {
    let mut body = String::new();
    for event in events {
        let kind = event["type"].as_str().unwrap_or("message");
        body.push_str(&format!("event: {kind}\ndata: {event}\n\n"));
    }
    body
}

/// Completed response object with the given output items
pub fn response_object(output: Value) -> Value {
    serde_json::json!({
        "id": "resp_mock_1",
        "object": "response",
        "model": "gpt-mock-2025-01-01",
        "status": "completed",
        "output": output,
        "usage": {
            "input_tokens": 10,
            "input_tokens_details": {"cached_tokens": 2},
            "output_tokens": 5,
            "output_tokens_details": {"reasoning_tokens": 0},
            "total_tokens": 15
        }
    })
}
