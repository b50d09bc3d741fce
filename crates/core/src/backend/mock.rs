//! Scripted backend for tests and offline runs.

use super::models::{ChatReply, ChatRequest, OutputPaths, RunAgentsResponse};
use super::{Backend, BackendError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Replays fixed answers and records what it was asked.
#[derive(Clone)]
pub struct MockBackend {
    run_result: Result<RunAgentsResponse, BackendError>,
    chat_result: Result<ChatReply, BackendError>,
    output_paths: OutputPaths,
    run_calls: Arc<Mutex<Vec<String>>>,
    chat_calls: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockBackend {
    /// A backend whose calls all succeed with empty bodies.
    pub fn success() -> Self {
        Self::with_run_result(Ok(RunAgentsResponse {
            success: true,
            ..RunAgentsResponse::default()
        }))
    }

    pub fn with_run_result(run_result: Result<RunAgentsResponse, BackendError>) -> Self {
        Self {
            run_result,
            chat_result: Ok(ChatReply {
                response: "Mock reply".to_string(),
            }),
            output_paths: OutputPaths {
                output_path: "/tmp/atf/Output".to_string(),
                ..OutputPaths::default()
            },
            run_calls: Arc::new(Mutex::new(Vec::new())),
            chat_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A backend whose run call fails with `status` and `message`.
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self::with_run_result(Err(BackendError::Upstream {
            status,
            message: message.into(),
        }))
    }

    pub fn with_chat_result(mut self, chat_result: Result<ChatReply, BackendError>) -> Self {
        self.chat_result = chat_result;
        self
    }

    /// Input identifiers passed to `run_all_agents`, in call order.
    pub fn run_calls(&self) -> Vec<String> {
        self.run_calls.lock().clone()
    }

    pub fn chat_calls(&self) -> Vec<ChatRequest> {
        self.chat_calls.lock().clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn run_all_agents(&self, file_name: &str) -> Result<RunAgentsResponse, BackendError> {
        self.run_calls.lock().push(file_name.to_string());
        self.run_result.clone()
    }

    async fn output_paths(&self) -> Result<OutputPaths, BackendError> {
        Ok(self.output_paths.clone())
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        self.chat_calls.lock().push(request.clone());
        self.chat_result.clone()
    }
}
