//! Errors surfaced by the workflow engine.

use crate::agents::base::AgentError;
use crate::backend::BackendError;
use crate::gate::GateError;
use thiserror::Error;

/// Reasons a workflow run can be refused or end in `failed`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The run was refused before any state was touched.
    #[error("{0}")]
    Validation(String),

    #[error("A workflow run is already in progress")]
    RunInProgress,

    #[error("{0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Gate(#[from] GateError),
}

impl From<BackendError> for WorkflowError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Network(detail) => WorkflowError::Network(detail),
            BackendError::Upstream { status, message } => WorkflowError::Upstream { status, message },
            BackendError::Decode(detail) => WorkflowError::Network(detail),
        }
    }
}

/// Convenience alias for engine results.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
