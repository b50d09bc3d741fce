//! Built-in agent catalog and step numbering.

use atf_protocol::agent_models::AgentDescriptor;
use atf_protocol::config_models::StepNumbering;

/// The seven ATF agents, used when no `.atf/agents/` directory exists.
///
/// All are enabled; confirmation is requested after the test data agent.
pub fn default_descriptors() -> Vec<AgentDescriptor> {
    vec![
        AgentDescriptor::new(1, "Requirement Analysis Agent")
            .with_description(
                "Analyzes uploaded requirement document to extract key features, functionalities, and business objectives.",
            )
            .with_narration([
                "Analyzing requirements document...",
                "Extracting key features and functionalities...",
                "Identifying business objectives...",
            ])
            .with_result("1_requirements_analyst", "requirements"),
        AgentDescriptor::new(2, "User Story Generation Agent")
            .with_description("Converts requirements into structured user stories with acceptance criteria.")
            .with_narration([
                "Creating user stories from requirements...",
                "Adding acceptance criteria...",
                "Validating user story format...",
            ])
            .with_result("2_user_story_creator", "user_stories"),
        AgentDescriptor::new(3, "Test Case Generation Agent")
            .with_description(
                "Generates detailed test cases (steps, expected results, priority) with requirement traceability.",
            )
            .with_narration([
                "Generating test cases from user stories...",
                "Defining test steps and expected results...",
                "Assigning priorities and status...",
            ])
            .with_result("3_test_case_generator", "test_cases"),
        AgentDescriptor::new(4, "Test Data Generation Agent")
            .with_description("Outputs structured JSON test data for test cases.")
            .with_narration([
                "Generating test data sets...",
                "Creating realistic test data values...",
                "Validating test data format...",
            ])
            .with_checkpoint(true)
            .with_result("4_test_data_generator", "test_data"),
        AgentDescriptor::new(5, "Automation Design Agent")
            .with_description("Generates automation scripts (.vb, .py, .java, .tsu, .js)."),
        AgentDescriptor::new(6, "Automation Execution Agent")
            .with_description("Execution reports and logs."),
        AgentDescriptor::new(7, "Self-Healing & Optimization Agent").with_description(
            "Handles requirement changes and updates impacted test cases and automation assets.",
        ),
    ]
}

/// Display step number (1-based) of the agent `id`.
///
/// Returns `None` for unknown ids, and for disabled agents under
/// [`StepNumbering::Enabled`].
pub fn step_number(descriptors: &[AgentDescriptor], id: u32, policy: StepNumbering) -> Option<usize> {
    match policy {
        StepNumbering::Descriptor => descriptors.iter().position(|d| d.id == id).map(|i| i + 1),
        StepNumbering::Enabled => descriptors
            .iter()
            .filter(|d| d.enabled)
            .position(|d| d.id == id)
            .map(|i| i + 1),
    }
}

/// Enabled descriptors in ascending id order.
pub fn enabled_in_order(descriptors: &[AgentDescriptor]) -> Vec<&AgentDescriptor> {
    let mut enabled: Vec<&AgentDescriptor> = descriptors.iter().filter(|d| d.enabled).collect();
    enabled.sort_by_key(|d| d.id);
    enabled
}
