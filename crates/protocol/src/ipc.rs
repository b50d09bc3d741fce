//! Inter-process communication protocol.
//!
//! This module defines the message types for asynchronous communication
//! between the TUI (user interface) and the Core (workflow engine).
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Commands sent from TUI to Core
//! - `Event`: Status updates sent from Core to TUI
//!
//! Communication is asynchronous and channel-based, so the UI stays
//! responsive while the engine is suspended at a narration pause or a gate.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::chat_models::ChatMessage;
use crate::gate_models::GateRequest;
use crate::run_models::RunStatus;
use crate::session_models::SessionMessage;

/// Operations sent from the UI to the Core.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "startWorkflow",
///   "payload": { "input": "Requirements.docx" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Start a workflow run for the given input identifier (selected file).
    StartWorkflow { input: String },

    /// Answer a pending checkpoint confirmation.
    ResolveGate {
        #[ts(type = "string")]
        gate_id: Uuid,
        proceed: bool,
    },

    /// Return to an idle state, discarding any pending confirmation.
    ResetWorkflow,

    /// Send a message to the assistant chat.
    SendChat { message: String },

    /// Shut down the application gracefully.
    Shutdown,
}

/// Events sent from the Core to the UI.
///
/// ```json
/// {
///   "type": "runStatusUpdate",
///   "payload": { "run_id": "uuid-here", "status": "AWAITING_GATE", "current_agent_id": 4 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A new run replaced all previous run state.
    RunStarted {
        #[ts(type = "string")]
        run_id: Uuid,
        input: String,
    },

    /// The run's status or current agent changed.
    RunStatusUpdate {
        #[ts(type = "string")]
        run_id: Uuid,
        status: RunStatus,
        current_agent_id: Option<u32>,
    },

    /// A message was appended to the session log.
    SessionMessage {
        #[ts(type = "string")]
        run_id: Uuid,
        message: SessionMessage,
    },

    /// An agent entered the completed set.
    AgentCompleted {
        #[ts(type = "string")]
        run_id: Uuid,
        agent_id: u32,
    },

    /// The run is suspended waiting for a decision.
    GateOpened {
        #[ts(type = "string")]
        run_id: Uuid,
        request: GateRequest,
    },

    /// A decision was applied to the pending gate.
    GateResolved {
        #[ts(type = "string")]
        run_id: Uuid,
        #[ts(type = "string")]
        gate_id: Uuid,
        proceed: bool,
    },

    /// The run finished and the backend results were recorded.
    RunCompleted {
        #[ts(type = "string")]
        run_id: Uuid,
    },

    /// The run was stopped at a checkpoint.
    RunAborted {
        #[ts(type = "string")]
        run_id: Uuid,
    },

    /// The run failed.
    RunFailed {
        #[ts(type = "string")]
        run_id: Uuid,
        error: String,
    },

    /// All run state was cleared.
    RunReset,

    /// An entry was appended to the chat log.
    ChatMessage { message: ChatMessage },

    /// An operation was refused (validation failure, run already in progress).
    OperationRejected { reason: String },
}
