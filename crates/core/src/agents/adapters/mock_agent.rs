//! Test double for the `Agent` trait.

use crate::agents::base::{Agent, AgentError, AgentEvent, AgentEventStream, ExecutionContext};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Behavior {
    Succeed,
    FailAfterStart(String),
    Unavailable,
}

/// Agent that echoes its context and records every execution.
///
/// Clones share the record, so a test can keep one handle and hand the other
/// to an `AgentManager`.
#[derive(Debug, Clone)]
pub struct MockAgent {
    behavior: Behavior,
    executed: Arc<Mutex<Vec<u32>>>,
}

impl MockAgent {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Emits `"<name> processed <input>"` and completes.
    pub fn success() -> Self {
        Self::with_behavior(Behavior::Succeed)
    }

    /// Emits one progress line, then fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::FailAfterStart(message.into()))
    }

    pub fn unavailable() -> Self {
        Self::with_behavior(Behavior::Unavailable)
    }

    /// Ids of the descriptors this agent was executed for, in call order.
    pub fn executed(&self) -> Vec<u32> {
        self.executed.lock().clone()
    }
}

#[async_trait]
impl Agent for MockAgent {
    async fn check_availability(&self) -> bool {
        !matches!(self.behavior, Behavior::Unavailable)
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<AgentEventStream, AgentError> {
        let name = &context.descriptor.name;
        let events = match &self.behavior {
            Behavior::Unavailable => {
                return Err(AgentError::NotAvailable(format!("{name} is offline")));
            }
            Behavior::Succeed => vec![
                Ok(AgentEvent::Progress(format!("{name} processed {}", context.input))),
                Ok(AgentEvent::Completed),
            ],
            Behavior::FailAfterStart(message) => vec![
                Ok(AgentEvent::Progress(format!("{name} started on {}", context.input))),
                Err(AgentError::ExecutionError(message.clone())),
            ],
        };

        self.executed.lock().push(context.descriptor.id);
        Ok(Box::pin(tokio_stream::iter(events)))
    }
}
