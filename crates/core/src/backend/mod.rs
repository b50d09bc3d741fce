//! Client side of the ATF backend.
//!
//! The [`Backend`] trait is the seam between the engine and the HTTP
//! service; [`HttpBackend`] talks to a real server and [`MockBackend`]
//! replays scripted answers in tests.

pub mod http;
pub mod mock;
pub mod models;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpBackend;
pub use mock::MockBackend;
pub use models::{ChatReply, ChatRequest, FileContext, OutputPaths, RunAgentsResponse};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("{0}")]
    Network(String),

    /// Non-2xx answer; `message` is the server's own detail when it sent one.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// A 2xx answer whose body could not be read.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /run-all-agents` for the given input file.
    async fn run_all_agents(&self, file_name: &str) -> Result<RunAgentsResponse, BackendError>;

    /// `GET /output-path`.
    async fn output_paths(&self) -> Result<OutputPaths, BackendError>;

    /// `POST /chat`.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError>;
}
