//! Checkpoint confirmation requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A pending confirmation raised after a checkpoint agent completes.
///
/// Exists only between the checkpoint and the external decision; a
/// resolved request is never reused.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct GateRequest {
    /// Identifies the request a decision answers.
    #[ts(type = "string")]
    pub id: Uuid,

    /// Checkpoint agent that triggered the request.
    pub agent_id: u32,

    pub prompt: String,

    pub created_at: DateTime<Utc>,
}

impl GateRequest {
    pub fn new(agent_id: u32, prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_id,
            prompt: prompt.into(),
            created_at: Utc::now(),
        }
    }
}
