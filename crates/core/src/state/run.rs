//! Workflow run state machine.
//!
//! Free functions that move a [`WorkflowRun`] between states and emit the
//! matching [`Event`] for every change. The engine is the only caller during
//! a run; nothing here blocks or fails.

use atf_protocol::ipc::Event;
use atf_protocol::run_models::{RunStatus, WorkflowRun};
use atf_protocol::session_models::{MessageKind, SessionMessage};
use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Replace `run` with a fresh running run for `input`.
///
/// Nothing from the previous run carries over.
pub fn begin_run(run: &mut WorkflowRun, input: &str, events_tx: &UnboundedSender<Event>) {
    *run = WorkflowRun {
        id: Uuid::new_v4(),
        input: Some(input.to_string()),
        status: RunStatus::Running,
        started_at: Some(Utc::now()),
        ..WorkflowRun::default()
    };

    let _ = events_tx.send(Event::RunStarted {
        run_id: run.id,
        input: input.to_string(),
    });
    emit_status(run, events_tx);
}

fn emit_status(run: &WorkflowRun, events_tx: &UnboundedSender<Event>) {
    let _ = events_tx.send(Event::RunStatusUpdate {
        run_id: run.id,
        status: run.status,
        current_agent_id: run.current_agent_id,
    });
}

/// Append a message to the session log and emit it.
pub fn log_to_run(
    run: &mut WorkflowRun,
    events_tx: &UnboundedSender<Event>,
    text: impl Into<String>,
    kind: MessageKind,
    agent_name: &str,
) {
    let message = SessionMessage::new(text, kind, agent_name);
    run.log.append(message.clone());
    let _ = events_tx.send(Event::SessionMessage {
        run_id: run.id,
        message,
    });
}

/// Set (or clear) the agent currently executing.
pub fn set_current_agent(run: &mut WorkflowRun, events_tx: &UnboundedSender<Event>, agent_id: Option<u32>) {
    run.current_agent_id = agent_id;
    emit_status(run, events_tx);
}

/// Record `agent_id` as completed. Returns false if it was out of order.
pub fn complete_agent(run: &mut WorkflowRun, events_tx: &UnboundedSender<Event>, agent_id: u32) -> bool {
    if !run.mark_completed(agent_id) {
        return false;
    }
    let _ = events_tx.send(Event::AgentCompleted {
        run_id: run.id,
        agent_id,
    });
    true
}

/// Suspend at a checkpoint.
pub fn await_gate(run: &mut WorkflowRun, events_tx: &UnboundedSender<Event>) {
    run.status = RunStatus::AwaitingGate;
    emit_status(run, events_tx);
}

/// Continue after a positive gate decision.
pub fn resume_run(run: &mut WorkflowRun, events_tx: &UnboundedSender<Event>) {
    run.status = RunStatus::Running;
    emit_status(run, events_tx);
}

fn finish(run: &mut WorkflowRun, status: RunStatus, events_tx: &UnboundedSender<Event>) {
    run.status = status;
    run.current_agent_id = None;
    run.finished_at = Some(Utc::now());
    emit_status(run, events_tx);
}

pub fn complete_run(run: &mut WorkflowRun, events_tx: &UnboundedSender<Event>) {
    finish(run, RunStatus::Completed, events_tx);
    let _ = events_tx.send(Event::RunCompleted { run_id: run.id });
}

pub fn abort_run(run: &mut WorkflowRun, events_tx: &UnboundedSender<Event>) {
    finish(run, RunStatus::Aborted, events_tx);
    let _ = events_tx.send(Event::RunAborted { run_id: run.id });
}

/// Mark the run failed with `error`.
pub fn fail_run(run: &mut WorkflowRun, events_tx: &UnboundedSender<Event>, error: String) {
    run.error = Some(error.clone());
    finish(run, RunStatus::Failed, events_tx);
    let _ = events_tx.send(Event::RunFailed { run_id: run.id, error });
}
