//! Global configuration models for `.atf/config.toml`.
//!
//! This module defines the structure of the global configuration file that
//! controls the backend location, workflow wording, and narration pacing.

use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;
use ts_rs::TS;

/// Default backend base URL.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// How step numbers are displayed next to agents.
///
/// Step numbers are cosmetic; they never affect execution order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum StepNumbering {
    /// Position in the full descriptor list, disabled agents included.
    #[default]
    Descriptor,

    /// Position among enabled descriptors only.
    Enabled,
}

/// Scheduling pauses inserted between workflow steps, in milliseconds.
///
/// These are cooperative suspension points, not real work.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct Pacing {
    /// Pause after the workflow start message.
    pub workflow_start_ms: u64,
    /// Pause after an agent's start message.
    pub agent_start_ms: u64,
    /// Pause after each narration line except the last.
    pub narration_step_ms: u64,
    /// Pause after the last narration line.
    pub narration_final_ms: u64,
    /// Pause after an agent's completion message.
    pub agent_complete_ms: u64,
    /// Pause between two agents, with no agent marked current.
    pub between_agents_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            workflow_start_ms: 1000,
            agent_start_ms: 800,
            narration_step_ms: 2000,
            narration_final_ms: 1500,
            agent_complete_ms: 1000,
            between_agents_ms: 500,
        }
    }
}

impl Pacing {
    /// No pauses at all. Used by tests and by `atf run --fast`.
    pub fn instant() -> Self {
        Self {
            workflow_start_ms: 0,
            agent_start_ms: 0,
            narration_step_ms: 0,
            narration_final_ms: 0,
            agent_complete_ms: 0,
            between_agents_ms: 0,
        }
    }

    /// Delay after narration line `index` of `total`.
    pub fn narration_delay(&self, index: usize, total: usize) -> Duration {
        if index + 1 >= total {
            Duration::from_millis(self.narration_final_ms)
        } else {
            Duration::from_millis(self.narration_step_ms)
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_workflow_name() -> String {
    "ATF Workflow".to_string()
}

fn default_checkpoint_prompt() -> String {
    "Test data has been generated. Do you want to proceed with the next agents?".to_string()
}

/// Represents global settings from `.atf/config.toml`.
///
/// # Example
///
/// ```toml
/// # .atf/config.toml
/// backend_url = "http://localhost:8000"
/// workflow_name = "ATF Workflow"
/// step_numbering = "descriptor"
///
/// [pacing]
/// agent_start_ms = 200
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct GlobalConfig {
    /// Base URL of the backend service hosting `/run-all-agents`.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Name used as the `agent_name` of workflow-level session messages.
    #[serde(default = "default_workflow_name")]
    pub workflow_name: String,

    /// Question shown when a checkpoint is reached.
    #[serde(default = "default_checkpoint_prompt")]
    pub checkpoint_prompt: String,

    #[serde(default)]
    pub step_numbering: StepNumbering,

    #[serde(default)]
    pub pacing: Pacing,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            workflow_name: default_workflow_name(),
            checkpoint_prompt: default_checkpoint_prompt(),
            step_numbering: StepNumbering::default(),
            pacing: Pacing::default(),
        }
    }
}
