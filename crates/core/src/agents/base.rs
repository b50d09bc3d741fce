//! Base Agent trait and supporting types.

use async_trait::async_trait;
use atf_protocol::agent_models::AgentDescriptor;
use atf_protocol::config_models::Pacing;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

/// Boxed stream of agent events, as returned by [`Agent::execute`].
pub type AgentEventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent, AgentError>> + Send>>;

/// Context information passed to agents during execution.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// The input identifier (selected file) of the run.
    pub input: String,

    /// The descriptor of the agent being executed.
    pub descriptor: AgentDescriptor,

    /// Pauses to insert between progress lines.
    pub pacing: Pacing,
}

impl ExecutionContext {
    /// Create an ExecutionContext with instant pacing.
    pub fn new(input: impl Into<String>, descriptor: AgentDescriptor) -> Self {
        Self {
            input: input.into(),
            descriptor,
            pacing: Pacing::instant(),
        }
    }

    /// Set the pacing.
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// A narration line, logged as an `info` message.
    Progress(String),
    /// The agent finished its work.
    Completed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Agent not available: {0}")]
    NotAvailable(String),
    #[error("Execution failed: {0}")]
    ExecutionError(String),
}

#[async_trait]
pub trait Agent: Send + Sync {
    async fn check_availability(&self) -> bool;
    async fn execute(&self, context: &ExecutionContext) -> Result<AgentEventStream, AgentError>;
}
