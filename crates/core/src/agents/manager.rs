//! Agent manager pairing descriptors with agent implementations.
//!
//! The `AgentManager` is responsible for:
//! - Holding the immutable descriptor list for the process lifetime
//! - Looking up the agent that runs a given descriptor
//! - Checking availability before execution

use crate::agents::adapters::NarratedAgent;
use crate::agents::base::{Agent, AgentError, AgentEventStream, ExecutionContext};
use crate::agents::catalog::enabled_in_order;
use atf_protocol::agent_models::AgentDescriptor;
use std::collections::HashMap;
use std::sync::Arc;

/// Manages the registered agents.
///
/// Every descriptor is backed by a [`NarratedAgent`] unless an explicit
/// implementation is registered with [`AgentManager::with_agent`].
pub struct AgentManager {
    descriptors: Vec<AgentDescriptor>,
    agents: HashMap<u32, Arc<dyn Agent>>,
}

impl AgentManager {
    /// Create a new AgentManager for the given descriptors.
    ///
    /// # Arguments
    ///
    /// * `descriptors` - Agent descriptors from `.atf/agents/*.md` or the built-in catalog
    pub fn new(descriptors: Vec<AgentDescriptor>) -> Self {
        let narrated: Arc<dyn Agent> = Arc::new(NarratedAgent::new());
        let agents = descriptors
            .iter()
            .map(|d| (d.id, Arc::clone(&narrated)))
            .collect();

        Self {
            descriptors,
            agents,
        }
    }

    /// Replace the implementation backing descriptor `id`.
    pub fn with_agent(mut self, id: u32, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(id, agent);
        self
    }

    /// All descriptors, in definition order.
    pub fn descriptors(&self) -> &[AgentDescriptor] {
        &self.descriptors
    }

    /// Enabled descriptors in ascending id order.
    pub fn enabled(&self) -> Vec<&AgentDescriptor> {
        enabled_in_order(&self.descriptors)
    }

    /// Get the agent backing descriptor `id`.
    pub fn get_agent(&self, id: u32) -> Option<Arc<dyn Agent>> {
        self.agents.get(&id).cloned()
    }

    /// Execute the agent backing `context.descriptor`.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::NotAvailable` if no agent is registered for the
    /// descriptor or the registered agent reports itself unavailable.
    pub async fn execute(&self, context: &ExecutionContext) -> Result<AgentEventStream, AgentError> {
        let descriptor = &context.descriptor;
        let agent = self.get_agent(descriptor.id).ok_or_else(|| {
            AgentError::NotAvailable(format!("Agent '{}' not found in registry", descriptor.name))
        })?;

        if !agent.check_availability().await {
            return Err(AgentError::NotAvailable(format!(
                "Agent '{}' is not available",
                descriptor.name
            )));
        }

        agent.execute(context).await
    }
}
