//! Fixtures for descriptor sets, settings and configuration directories.

#![allow(dead_code)]

use atf_core::agents::AgentManager;
use atf_core::backend::Backend;
use atf_core::engine::WorkflowEngine;
use atf_protocol::agent_models::AgentDescriptor;
use atf_protocol::config_models::{GlobalConfig, Pacing};
use std::sync::Arc;
use tempfile::TempDir;

/// Settings with every delay set to zero.
pub fn instant_settings() -> GlobalConfig {
    GlobalConfig {
        pacing: Pacing::instant(),
        ..GlobalConfig::default()
    }
}

/// Four enabled agents with a checkpoint after the fourth.
pub fn four_agents() -> Vec<AgentDescriptor> {
    vec![
        AgentDescriptor::new(1, "Requirement Analysis Agent")
            .with_narration(["Analyzing requirements document..."])
            .with_result("1_requirements_analyst", "requirements"),
        AgentDescriptor::new(2, "User Story Generation Agent")
            .with_result("2_user_story_creator", "user_stories"),
        AgentDescriptor::new(3, "Test Case Generation Agent")
            .with_result("3_test_case_generator", "test_cases"),
        AgentDescriptor::new(4, "Test Data Generation Agent")
            .with_checkpoint(true)
            .with_result("4_test_data_generator", "test_data"),
    ]
}

pub fn engine_with(descriptors: Vec<AgentDescriptor>, backend: Arc<dyn Backend>) -> WorkflowEngine {
    WorkflowEngine::new(AgentManager::new(descriptors), backend, instant_settings())
}

/// A project root holding `.atf/config.toml` and two agent files.
pub fn create_test_project(backend_url: &str) -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let atf_dir = temp_dir.path().join(".atf");
    std::fs::create_dir_all(atf_dir.join("agents"))?;

    let config_toml = format!(
        r#"backend_url = "{backend_url}"
workflow_name = "Test Workflow"

[pacing]
workflow_start_ms = 0
agent_start_ms = 0
narration_step_ms = 0
narration_final_ms = 0
agent_complete_ms = 0
between_agents_ms = 0
"#
    );
    std::fs::write(atf_dir.join("config.toml"), config_toml)?;

    let analysis = r#"---
id: 1
name: Requirement Analysis Agent
result-key: 1_requirements_analyst
list-field: requirements
---

- Analyzing requirements document...
- Identifying business objectives...
"#;
    let test_data = r#"---
id: 4
name: Test Data Generation Agent
checkpoint-after: true
result-key: 4_test_data_generator
list-field: test_data
---

- Generating test data sets...
"#;
    std::fs::write(atf_dir.join("agents/1-analysis.md"), analysis)?;
    std::fs::write(atf_dir.join("agents/4-test-data.md"), test_data)?;

    Ok(temp_dir)
}
