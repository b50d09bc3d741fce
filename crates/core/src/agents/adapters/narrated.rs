//! Simulated agent that narrates its progress.
//!
//! The backend performs the real work in a single call once every agent has
//! been walked; locally each agent only reports what it is doing, paced by
//! the configured delays.

use crate::agents::base::{Agent, AgentError, AgentEvent, AgentEventStream, ExecutionContext};
use async_trait::async_trait;
use std::time::Duration;

/// Emits the descriptor's narration lines, one per pacing step, then completes.
#[derive(Debug, Clone, Default)]
pub struct NarratedAgent;

impl NarratedAgent {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for NarratedAgent {
    async fn check_availability(&self) -> bool {
        true
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<AgentEventStream, AgentError> {
        let lines = context.descriptor.narration.clone();
        let pacing = context.pacing.clone();

        let stream = async_stream::stream! {
            let total = lines.len();
            for (index, line) in lines.into_iter().enumerate() {
                yield Ok(AgentEvent::Progress(line));
                let delay = pacing.narration_delay(index, total);
                if delay > Duration::ZERO {
                    tokio::time::sleep(delay).await;
                }
            }
            yield Ok(AgentEvent::Completed);
        };

        Ok(Box::pin(stream))
    }
}
