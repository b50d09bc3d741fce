//! Agent descriptor models for `.atf/agents/*.md`.
//!
//! Agents are defined as Markdown files with YAML front matter. The front
//! matter holds the descriptor fields; bullet lines in the body become the
//! narration the simulated agent emits while it works.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

fn default_enabled() -> bool {
    true
}

/// Describes one stage of the workflow.
///
/// Descriptors are immutable once the process has started. Disabled
/// descriptors are skipped by the engine entirely: they never receive a
/// start message and never enter the completed set.
///
/// # Example
///
/// ```markdown
/// ---
/// id: 4
/// name: Test Data Generation Agent
/// description: Outputs structured JSON test data for test cases.
/// checkpoint-after: true
/// result-key: 4_test_data_generator
/// list-field: test_data
/// ---
///
/// - Generating test data sets...
/// - Creating realistic test data values...
/// - Validating test data format...
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct AgentDescriptor {
    /// Ordinal of the agent. Descriptors run in ascending id order.
    pub id: u32,

    /// Display name, also used as the `agent_name` of session messages.
    pub name: String,

    /// Human-readable description of the agent's purpose.
    #[serde(default)]
    pub description: String,

    /// Disabled agents are invisible to the engine.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// When set, the engine asks for confirmation after this agent completes.
    #[serde(default)]
    pub checkpoint_after: bool,

    /// Progress lines emitted as `info` messages while the agent runs.
    #[serde(default)]
    pub narration: Vec<String>,

    /// Key of this agent's payload in the backend result set
    /// (e.g. `2_user_story_creator`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_key: Option<String>,

    /// List field the normalizer extracts from the payload (e.g. `user_stories`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_field: Option<String>,
}

impl AgentDescriptor {
    /// Create an enabled descriptor with no narration and no result mapping.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            enabled: true,
            checkpoint_after: false,
            narration: Vec::new(),
            result_key: None,
            list_field: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_checkpoint(mut self, checkpoint_after: bool) -> Self {
        self.checkpoint_after = checkpoint_after;
        self
    }

    pub fn with_narration<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.narration = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Map this agent to a payload in the backend result set.
    pub fn with_result(mut self, result_key: impl Into<String>, list_field: impl Into<String>) -> Self {
        self.result_key = Some(result_key.into());
        self.list_field = Some(list_field.into());
        self
    }
}
