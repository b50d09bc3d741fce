//! Session log models.
//!
//! The session log is the ordered, append-only audit trail of a workflow run.
//! Physical append order is the only ordering guarantee: two messages may
//! carry identical timestamps.

use chrono::Local;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Severity/category of a session message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    System,
}

/// A single entry of the session log. Immutable once appended.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct SessionMessage {
    pub text: String,
    pub kind: MessageKind,
    /// Agent (or workflow) the message is attributed to.
    pub agent_name: String,
    /// Local wall-clock time of day at append time (`HH:MM:SS`).
    pub timestamp: String,
}

impl SessionMessage {
    /// Create a message stamped with the current local time of day.
    pub fn new(text: impl Into<String>, kind: MessageKind, agent_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            agent_name: agent_name.into(),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

/// Append-only ordered sequence of session messages.
///
/// `append` never fails and never blocks. No size bound is enforced here;
/// bounding is a caller concern.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
pub struct SessionLog(Vec<SessionMessage>);

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: SessionMessage) {
        self.0.push(message);
    }

    /// Read-only view of every message in append order.
    pub fn snapshot(&self) -> &[SessionMessage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&SessionMessage> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SessionMessage> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a SessionLog {
    type Item = &'a SessionMessage;
    type IntoIter = std::slice::Iter<'a, SessionMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
