//! Workflow manager bridging front ends and the engine.
//!
//! The WorkflowManager owns the engine and the chat session, runs workflows
//! in background tasks, and answers [`Op`]s from the UI with [`Event`]s.

use crate::chat::ChatSession;
use crate::engine::WorkflowEngine;
use crate::error::{WorkflowError, WorkflowResult};
use crate::gate::GateResolution;
use atf_protocol::chat_models::ChatMessage;
use atf_protocol::ipc::{Event, Op};
use atf_protocol::run_models::WorkflowRun;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Front-end facing handle to the engine.
///
/// Cloning is cheap; all clones share one engine, one chat session and one
/// record of the latest run.
#[derive(Clone)]
pub struct WorkflowManager {
    engine: Arc<WorkflowEngine>,
    chat: Arc<Mutex<ChatSession>>,
    last_run: Arc<parking_lot::Mutex<WorkflowRun>>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
    events_tx: UnboundedSender<Event>,
}

impl WorkflowManager {
    /// Create a new WorkflowManager.
    ///
    /// # Arguments
    ///
    /// * `engine` - The engine that executes runs
    /// * `events_tx` - Channel for sending events to the UI
    pub fn new(engine: WorkflowEngine, events_tx: UnboundedSender<Event>) -> Self {
        let chat = ChatSession::new(engine.backend());
        Self {
            engine: Arc::new(engine),
            chat: Arc::new(Mutex::new(chat)),
            last_run: Arc::new(parking_lot::Mutex::new(WorkflowRun::idle())),
            task: Arc::new(Mutex::new(None)),
            events_tx,
        }
    }

    pub fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    /// The latest finished run, or an idle run.
    pub fn last_run(&self) -> WorkflowRun {
        self.last_run.lock().clone()
    }

    fn reject(&self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::debug!(%reason, "operation rejected");
        let _ = self.events_tx.send(Event::OperationRejected { reason });
    }

    /// Start a workflow for `input` in the background.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank input and `RunInProgress` while another run
    /// is active; in both cases nothing is spawned.
    pub async fn start_workflow(&self, input: &str) -> WorkflowResult<()> {
        if input.trim().is_empty() {
            return Err(WorkflowError::Validation("Please select a file first".to_string()));
        }
        let mut task = self.task.lock().await;
        if self.engine.is_running() || task.as_ref().is_some_and(|h| !h.is_finished()) {
            return Err(WorkflowError::RunInProgress);
        }

        let engine = Arc::clone(&self.engine);
        let last_run = Arc::clone(&self.last_run);
        let events_tx = self.events_tx.clone();
        let input = input.to_string();

        let handle = tokio::spawn(async move {
            let mut run = WorkflowRun::idle();
            match engine.run(&mut run, Some(&input), &events_tx).await {
                Err(WorkflowError::RunInProgress) => {
                    let _ = events_tx.send(Event::OperationRejected {
                        reason: WorkflowError::RunInProgress.to_string(),
                    });
                }
                _ => *last_run.lock() = run,
            }
        });

        *task = Some(handle);
        Ok(())
    }

    /// Run a workflow to completion on the current task.
    ///
    /// Used by headless front ends that want the terminal state directly.
    pub async fn run_to_completion(&self, input: &str) -> (WorkflowRun, WorkflowResult<()>) {
        let mut run = WorkflowRun::idle();
        let result = self.engine.run(&mut run, Some(input), &self.events_tx).await;
        if !matches!(result, Err(WorkflowError::Validation(_) | WorkflowError::RunInProgress)) {
            *self.last_run.lock() = run.clone();
        }
        (run, result)
    }

    /// Answer the pending confirmation `gate_id`.
    pub fn resolve_gate(&self, gate_id: Uuid, proceed: bool) -> GateResolution {
        let resolution = self.engine.gate().resolve(gate_id, proceed);
        if resolution == GateResolution::Consumed {
            self.reject("Confirmation was already answered");
        }
        resolution
    }

    /// Return to idle, discarding a pending confirmation.
    ///
    /// A run waiting at the gate is aborted and awaited first.
    ///
    /// # Errors
    ///
    /// `RunInProgress` if a run is executing or about to, and not waiting at
    /// the gate.
    pub async fn reset(&self) -> WorkflowResult<()> {
        if self.engine.gate().discard().is_some() {
            let handle = self.task.lock().await.take();
            if let Some(handle) = handle {
                let _ = handle.await;
            }
        } else {
            let task = self.task.lock().await;
            // A spawned run may not have claimed the engine yet.
            if self.engine.is_running() || task.as_ref().is_some_and(|h| !h.is_finished()) {
                return Err(WorkflowError::RunInProgress);
            }
        }

        *self.last_run.lock() = WorkflowRun::idle();
        let _ = self.events_tx.send(Event::RunReset);
        tracing::info!("workflow reset");
        Ok(())
    }

    /// Send a chat message about the latest run.
    ///
    /// Emits the question and the reply as [`Event::ChatMessage`].
    pub async fn send_chat(&self, message: &str) -> Option<ChatMessage> {
        let run = self.last_run();
        let mut chat = self.chat.lock().await;
        let reply = chat
            .send(message, run.input.as_deref(), run.results.as_ref())
            .await?;

        let history = chat.messages();
        if let Some(question) = history.len().checked_sub(2).and_then(|i| history.get(i)) {
            let _ = self.events_tx.send(Event::ChatMessage {
                message: question.clone(),
            });
        }
        let _ = self.events_tx.send(Event::ChatMessage {
            message: reply.clone(),
        });
        Some(reply)
    }

    /// Handle one operation. Returns false once `Shutdown` is received.
    pub async fn handle_op(&self, op: Op) -> bool {
        match op {
            Op::StartWorkflow { input } => {
                if let Err(err) = self.start_workflow(&input).await {
                    self.reject(err.to_string());
                }
            }
            Op::ResolveGate { gate_id, proceed } => {
                self.resolve_gate(gate_id, proceed);
            }
            Op::ResetWorkflow => {
                if let Err(err) = self.reset().await {
                    self.reject(err.to_string());
                }
            }
            Op::SendChat { message } => {
                let manager = self.clone();
                tokio::spawn(async move {
                    manager.send_chat(&message).await;
                });
            }
            Op::Shutdown => {
                self.engine.gate().discard();
                return false;
            }
        }
        true
    }

    /// Process operations until `Shutdown` or the channel closes.
    pub async fn serve(self, mut op_rx: UnboundedReceiver<Op>) {
        while let Some(op) = op_rx.recv().await {
            if !self.handle_op(op).await {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::manager::AgentManager;
    use crate::backend::MockBackend;
    use atf_protocol::agent_models::AgentDescriptor;
    use atf_protocol::config_models::{GlobalConfig, Pacing};
    use atf_protocol::run_models::RunStatus;
    use tokio::sync::mpsc;

    fn manager(backend: MockBackend) -> (WorkflowManager, mpsc::UnboundedReceiver<Event>) {
        let descriptors = vec![
            AgentDescriptor::new(1, "First"),
            AgentDescriptor::new(2, "Second").with_checkpoint(true),
            AgentDescriptor::new(3, "Third"),
        ];
        let settings = GlobalConfig {
            pacing: Pacing::instant(),
            ..GlobalConfig::default()
        };
        let engine = WorkflowEngine::new(AgentManager::new(descriptors), Arc::new(backend), settings);
        let (tx, rx) = mpsc::unbounded_channel();
        (WorkflowManager::new(engine, tx), rx)
    }

    async fn next_gate(rx: &mut mpsc::UnboundedReceiver<Event>) -> Uuid {
        loop {
            match rx.recv().await {
                Some(Event::GateOpened { request, .. }) => return request.id,
                Some(_) => continue,
                None => panic!("event channel closed before the gate opened"),
            }
        }
    }

    async fn wait_for(rx: &mut mpsc::UnboundedReceiver<Event>, done: fn(&Event) -> bool) {
        while let Some(event) = rx.recv().await {
            if done(&event) {
                return;
            }
        }
        panic!("event channel closed");
    }

    #[tokio::test]
    async fn test_start_and_proceed() {
        let backend = MockBackend::success();
        let (manager, mut rx) = manager(backend.clone());

        manager.start_workflow("req.docx").await.unwrap();
        let gate_id = next_gate(&mut rx).await;

        assert!(matches!(
            manager.start_workflow("other.docx").await,
            Err(WorkflowError::RunInProgress)
        ));

        assert_eq!(manager.resolve_gate(gate_id, true), GateResolution::Resolved);
        wait_for(&mut rx, |e| matches!(e, Event::RunCompleted { .. })).await;
        if let Some(handle) = manager.task.lock().await.take() {
            handle.await.unwrap();
        }

        let run = manager.last_run();
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.completed_agent_ids, vec![1, 2, 3]);
        assert_eq!(backend.run_calls(), vec!["req.docx".to_string()]);
    }

    #[tokio::test]
    async fn test_second_resolve_is_rejected() {
        let (manager, mut rx) = manager(MockBackend::success());

        manager.start_workflow("req.docx").await.unwrap();
        let gate_id = next_gate(&mut rx).await;

        assert_eq!(manager.resolve_gate(gate_id, false), GateResolution::Resolved);
        assert_eq!(manager.resolve_gate(gate_id, true), GateResolution::Consumed);
        wait_for(&mut rx, |e| matches!(e, Event::OperationRejected { .. })).await;
    }

    #[tokio::test]
    async fn test_reset_discards_pending_gate() {
        let backend = MockBackend::success();
        let (manager, mut rx) = manager(backend.clone());

        manager.start_workflow("req.docx").await.unwrap();
        next_gate(&mut rx).await;

        manager.reset().await.unwrap();

        assert!(manager.engine().gate().pending().is_none());
        assert!(!manager.engine().is_running());
        assert_eq!(manager.last_run().status, RunStatus::Idle);
        assert!(backend.run_calls().is_empty());
        wait_for(&mut rx, |e| matches!(e, Event::RunReset)).await;
    }

    #[tokio::test]
    async fn test_reset_right_after_start_is_rejected() {
        let (manager, mut rx) = manager(MockBackend::success());

        manager.start_workflow("req.docx").await.unwrap();
        assert!(matches!(manager.reset().await, Err(WorkflowError::RunInProgress)));

        let Some(Event::RunStarted { input, .. }) = rx.recv().await else {
            panic!("expected the run to start");
        };
        assert_eq!(input, "req.docx");
        next_gate(&mut rx).await;
        manager.reset().await.unwrap();
        assert_eq!(manager.last_run().status, RunStatus::Idle);
    }

    #[tokio::test]
    async fn test_blank_start_is_rejected_via_op() {
        let (manager, mut rx) = manager(MockBackend::success());

        assert!(manager.handle_op(Op::StartWorkflow { input: " ".to_string() }).await);
        assert!(matches!(
            rx.recv().await,
            Some(Event::OperationRejected { reason }) if reason == "Please select a file first"
        ));
        assert!(!manager.handle_op(Op::Shutdown).await);
    }

    #[tokio::test]
    async fn test_send_chat_emits_question_and_reply() {
        let (manager, mut rx) = manager(MockBackend::success());

        let reply = manager.send_chat("What was generated?").await;
        assert!(reply.is_some());

        let Some(Event::ChatMessage { message: question }) = rx.recv().await else {
            panic!("expected the question");
        };
        assert_eq!(question.content, "What was generated?");
        let Some(Event::ChatMessage { message: answer }) = rx.recv().await else {
            panic!("expected the reply");
        };
        assert_eq!(answer.content, "Mock reply");
    }
}
