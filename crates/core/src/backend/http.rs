//! reqwest implementation of [`Backend`].

use super::models::{ChatReply, ChatRequest, OutputPaths, RunAgentsRequest, RunAgentsResponse};
use super::{Backend, BackendError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

const RUN_FALLBACK_MESSAGE: &str = "Failed to run agents";
const CHAT_FALLBACK_MESSAGE: &str = "Failed to get AI response";
const OUTPUT_PATH_FALLBACK_MESSAGE: &str = "Failed to get output path";

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the backend at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = Client::builder()
            .build()
            .map_err(|e| BackendError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn network_error(err: reqwest::Error) -> BackendError {
    BackendError::Network(err.to_string())
}

/// Message for a failed response: `detail`, then `message`, then `fallback`.
/// A body that is not JSON yields `HTTP <status>: <reason>`.
fn error_message(status: StatusCode, body: &str, fallback: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return format!("HTTP {}: {}", status.as_u16(), status.canonical_reason().unwrap_or(""));
    };

    ["detail", "message"]
        .iter()
        .filter_map(|key| value.get(key))
        .find_map(|field| match field {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Null | Value::Bool(false) | Value::String(_) => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| fallback.to_string())
}

async fn decode<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body, fallback);
        tracing::debug!(status = status.as_u16(), %message, "backend returned an error");
        return Err(BackendError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn run_all_agents(&self, file_name: &str) -> Result<RunAgentsResponse, BackendError> {
        tracing::debug!(url = %self.url("/run-all-agents"), file_name, "requesting agent run");
        let response = self
            .client
            .post(self.url("/run-all-agents"))
            .json(&RunAgentsRequest {
                file_name: file_name.to_string(),
            })
            .send()
            .await
            .map_err(network_error)?;

        decode(response, RUN_FALLBACK_MESSAGE).await
    }

    async fn output_paths(&self) -> Result<OutputPaths, BackendError> {
        let response = self
            .client
            .get(self.url("/output-path"))
            .send()
            .await
            .map_err(network_error)?;

        decode(response, OUTPUT_PATH_FALLBACK_MESSAGE).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        let response = self
            .client
            .post(self.url("/chat"))
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        // Any failed chat response reads the same to the user.
        if !response.status().is_success() {
            return Err(BackendError::Upstream {
                status: response.status().as_u16(),
                message: CHAT_FALLBACK_MESSAGE.to_string(),
            });
        }
        decode(response, CHAT_FALLBACK_MESSAGE).await
    }
}
