//! One-shot suspension point for human confirmation.
//!
//! A [`Gate`] holds at most one pending [`GateRequest`]. The orchestrator
//! opens it and awaits the returned [`GateWait`]; any other holder of a
//! clone of the gate answers it by id with [`Gate::resolve`].
//!
//! ```text
//! unopened -> pending -> resolved(continue) | resolved(abort)
//! ```

use atf_protocol::gate_models::GateRequest;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("Another confirmation is already pending ({0})")]
    AlreadyPending(Uuid),
}

/// Outcome of a [`Gate::resolve`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateResolution {
    /// The decision was delivered to the waiting run.
    Resolved,
    /// The request was already answered, discarded, or never existed.
    Consumed,
}

struct Pending {
    request: GateRequest,
    decision_tx: oneshot::Sender<bool>,
}

/// Shared handle to the confirmation slot.
#[derive(Clone, Default)]
pub struct Gate {
    slot: Arc<Mutex<Option<Pending>>>,
}

/// The suspended side of an open gate.
pub struct GateWait {
    request: GateRequest,
    decision_rx: oneshot::Receiver<bool>,
}

impl GateWait {
    pub fn request(&self) -> &GateRequest {
        &self.request
    }

    /// Wait for the decision. A discarded request resolves to `false`.
    pub async fn decision(self) -> bool {
        self.decision_rx.await.unwrap_or(false)
    }
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new request for the checkpoint after `agent_id`.
    ///
    /// # Errors
    ///
    /// Returns `GateError::AlreadyPending` if an unanswered request exists.
    pub fn open(&self, agent_id: u32, prompt: impl Into<String>) -> Result<GateWait, GateError> {
        let mut slot = self.slot.lock();
        if let Some(pending) = slot.as_ref() {
            return Err(GateError::AlreadyPending(pending.request.id));
        }

        let request = GateRequest::new(agent_id, prompt);
        let (decision_tx, decision_rx) = oneshot::channel();
        *slot = Some(Pending {
            request: request.clone(),
            decision_tx,
        });

        tracing::debug!(gate_id = %request.id, agent_id, "gate opened");
        Ok(GateWait {
            request,
            decision_rx,
        })
    }

    /// Answer the request identified by `gate_id`.
    ///
    /// Only the first call for a given id delivers a decision; later calls
    /// report [`GateResolution::Consumed`] and change nothing.
    pub fn resolve(&self, gate_id: Uuid, proceed: bool) -> GateResolution {
        let pending = {
            let mut slot = self.slot.lock();
            match slot.as_ref() {
                Some(pending) if pending.request.id == gate_id => slot.take(),
                _ => None,
            }
        };

        match pending {
            Some(pending) => {
                tracing::debug!(%gate_id, proceed, "gate resolved");
                // The run may have gone away already; nothing to deliver then.
                let _ = pending.decision_tx.send(proceed);
                GateResolution::Resolved
            }
            None => GateResolution::Consumed,
        }
    }

    /// The currently pending request, if any.
    pub fn pending(&self) -> Option<GateRequest> {
        self.slot.lock().as_ref().map(|p| p.request.clone())
    }

    /// Drop the pending request. The waiting run observes an abort.
    pub fn discard(&self) -> Option<GateRequest> {
        let pending = self.slot.lock().take();
        pending.map(|p| {
            tracing::debug!(gate_id = %p.request.id, "gate discarded");
            p.request
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_delivers_decision() {
        let gate = Gate::new();
        let wait = gate.open(4, "Proceed?").unwrap();
        let id = wait.request().id;

        assert_eq!(gate.pending().map(|r| r.id), Some(id));
        assert_eq!(gate.resolve(id, true), GateResolution::Resolved);
        assert!(wait.decision().await);
        assert!(gate.pending().is_none());
    }

    #[tokio::test]
    async fn test_second_resolve_is_noop() {
        let gate = Gate::new();
        let wait = gate.open(4, "Proceed?").unwrap();
        let id = wait.request().id;

        assert_eq!(gate.resolve(id, false), GateResolution::Resolved);
        assert_eq!(gate.resolve(id, true), GateResolution::Consumed);
        assert_eq!(gate.resolve(id, true), GateResolution::Consumed);
        assert!(!wait.decision().await);
    }

    #[test]
    fn test_open_while_pending_is_rejected() {
        let gate = Gate::new();
        let first = gate.open(4, "Proceed?").unwrap();
        let err = gate.open(5, "Again?").err();
        assert_eq!(err, Some(GateError::AlreadyPending(first.request().id)));
    }

    #[test]
    fn test_resolve_unknown_id() {
        let gate = Gate::new();
        let _wait = gate.open(4, "Proceed?").unwrap();
        assert_eq!(gate.resolve(Uuid::new_v4(), true), GateResolution::Consumed);
        assert!(gate.pending().is_some());
    }

    #[tokio::test]
    async fn test_discard_counts_as_abort() {
        let gate = Gate::new();
        let wait = gate.open(4, "Proceed?").unwrap();
        let id = wait.request().id;

        assert_eq!(gate.discard().map(|r| r.id), Some(id));
        assert!(!wait.decision().await);
        assert_eq!(gate.resolve(id, true), GateResolution::Consumed);
        assert!(gate.open(4, "Proceed?").is_ok());
    }
}
