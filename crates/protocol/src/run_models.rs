//! Runtime workflow state models.
//!
//! This module defines the structures for tracking a single workflow run
//! and the typed results extracted from agent payloads.

use crate::session_models::SessionLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use ts_rs::TS;
use uuid::Uuid;

/// Lifecycle status of a workflow run.
///
/// Normal progression: Idle -> Running -> Completed.
///
/// Special states:
/// - AwaitingGate: suspended at a checkpoint until a decision arrives
/// - Aborted: the checkpoint decision was "do not proceed"
/// - Failed: the backend call (or an agent) failed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    AwaitingGate,
    Completed,
    Aborted,
    Failed,
}

impl RunStatus {
    /// A run in this status still owns the engine.
    pub fn is_active(self) -> bool {
        matches!(self, RunStatus::Running | RunStatus::AwaitingGate)
    }
}

/// Which strategy produced a normalized result.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionSource {
    /// The payload already carried a non-empty list under the expected field.
    Direct,
    /// `raw_response` was itself a JSON document (possibly double-encoded).
    DirectRawParse,
    /// Parsed from a block opened with ```` ```json ````.
    FencedJson,
    /// Parsed from a plain ```` ``` ```` block.
    FencedPlain,
    /// `raw_response` was already a structured object.
    FallbackRaw,
    /// Every strategy failed; the field is empty.
    None,
}

/// Typed result derived from a raw agent payload.
///
/// The raw text is kept verbatim so a failed extraction can still be
/// inspected by hand.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct NormalizedAgentResult {
    pub structured_fields: BTreeMap<String, Value>,
    pub extraction_source: ExtractionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl NormalizedAgentResult {
    /// Entries of the extracted list field, or an empty slice.
    pub fn items(&self, field: &str) -> &[Value] {
        self.structured_fields
            .get(field)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_extracted(&self) -> bool {
        self.extraction_source != ExtractionSource::None
    }
}

/// The mutable aggregate describing one workflow run.
///
/// Each call to the engine's `run` replaces the whole value; nothing carries
/// over between runs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
pub struct WorkflowRun {
    #[ts(type = "string")]
    pub id: Uuid,

    /// Input identifier (selected file) the run was started with.
    pub input: Option<String>,

    pub status: RunStatus,

    /// Agent currently executing, if any.
    pub current_agent_id: Option<u32>,

    /// Completed agents in execution order. Strictly increasing, no duplicates.
    pub completed_agent_ids: Vec<u32>,

    pub log: SessionLog,

    pub error: Option<String>,

    /// Result set returned by the backend, keyed by agent key.
    pub results: Option<BTreeMap<String, Value>>,

    /// Normalized result per agent key.
    pub normalized: BTreeMap<String, NormalizedAgentResult>,

    pub started_at: Option<DateTime<Utc>>,

    pub finished_at: Option<DateTime<Utc>>,
}

impl WorkflowRun {
    /// An idle run with nothing recorded.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Record an agent as completed.
    ///
    /// Returns `false` (and records nothing) if the id would break the
    /// strictly increasing order of the completed set.
    pub fn mark_completed(&mut self, agent_id: u32) -> bool {
        match self.completed_agent_ids.last() {
            Some(&last) if agent_id <= last => false,
            _ => {
                self.completed_agent_ids.push(agent_id);
                true
            }
        }
    }
}
