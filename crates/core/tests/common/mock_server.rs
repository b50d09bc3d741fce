//! In-process ATF backend served with axum.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Canned answer for one endpoint.
#[derive(Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
}

impl Canned {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    fn respond(&self) -> Response {
        (
            self.status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            self.body.clone(),
        )
            .into_response()
    }
}

#[derive(Clone)]
struct ServerState {
    run: Canned,
    chat: Canned,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

/// A running mock backend.
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockServer {
    /// Bodies received so far, tagged with their path.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body)
            .collect()
    }
}

async fn handle_run(State(state): State<ServerState>, Json(body): Json<Value>) -> Response {
    state.requests.lock().push(("/run-all-agents".to_string(), body));
    state.run.respond()
}

async fn handle_chat(State(state): State<ServerState>, Json(body): Json<Value>) -> Response {
    state.requests.lock().push(("/chat".to_string(), body));
    state.chat.respond()
}

async fn handle_output_path() -> Json<Value> {
    Json(json!({
        "output_path": "/srv/atf/Output",
        "excel_path": "/srv/atf/Output/Excel"
    }))
}

/// A successful run result with fenced and direct payloads.
pub fn sample_results() -> Value {
    json!({
        "success": true,
        "file_name": "requirements.docx",
        "results": {
            "1_requirements_analyst": {"requirements": ["REQ-1", "REQ-2"]},
            "4_test_data_generator": {
                "raw_response": "```json\n{\"test_data\": [{\"username\": \"alice\"}]}\n```"
            },
            "test_coverage": {"test_cases_count": 0, "coverage_percentage": 95},
            "excel_file": "Output/Excel/requirements_TestCases_TestData.xlsx"
        },
        "timestamp": "2024-01-01T12:00:00"
    })
}

/// Start a backend answering `/run-all-agents` with `run` and `/chat` with `chat`.
pub async fn spawn_backend(run: Canned, chat: Canned) -> MockServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        run,
        chat,
        requests: Arc::clone(&requests),
    };

    let app = Router::new()
        .route("/run-all-agents", post(handle_run))
        .route("/chat", post(handle_chat))
        .route("/output-path", get(handle_output_path))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockServer {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// A backend whose run and chat calls both succeed.
pub async fn spawn_ok_backend() -> MockServer {
    spawn_backend(
        Canned::json(StatusCode::OK, sample_results()),
        Canned::json(StatusCode::OK, json!({"response": "Two requirements were found."})),
    )
    .await
}
