//! Conversational assistant log.
//!
//! Kept apart from the session log: a failed chat turn is recorded here as
//! an error-flagged reply and never touches a workflow run.

use crate::backend::models::{ChatRequest, FileContext};
use crate::backend::Backend;
use atf_protocol::chat_models::ChatMessage;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Number of prior messages sent along with each question.
pub const HISTORY_WINDOW: usize = 10;

pub struct ChatSession {
    backend: Arc<dyn Backend>,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Ask the assistant `message` about `file_name` and the latest results.
    ///
    /// Returns the reply that was appended, or `None` for a blank message.
    pub async fn send(
        &mut self,
        message: &str,
        file_name: Option<&str>,
        agent_results: Option<&BTreeMap<String, Value>>,
    ) -> Option<ChatMessage> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        let history_start = self.messages.len().saturating_sub(HISTORY_WINDOW);
        let request = ChatRequest {
            message: message.to_string(),
            file_context: FileContext {
                file_name: file_name.map(str::to_string),
                timestamp: Utc::now().to_rfc3339(),
            },
            agent_results: agent_results
                .map(|results| results.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_else(Map::new),
            chat_history: self.messages[history_start..].to_vec(),
        };
        self.messages.push(ChatMessage::user(message));

        let reply = match self.backend.chat(&request).await {
            Ok(reply) => ChatMessage::assistant(reply.response),
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                ChatMessage::error(format!("Error: {err}. Please try again."))
            }
        };
        self.messages.push(reply.clone());
        Some(reply)
    }
}
