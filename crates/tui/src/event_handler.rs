//! Event handling for the TUI.
//!
//! Core events are folded into a [`WorkflowView`]; key events become
//! [`Op`]s for the `WorkflowManager` or edits of the local input state.

use crate::app::{Focus, InputState, WorkflowView};
use crate::widgets::SessionLogView;
use atf_protocol::chat_models::ChatRole;
use atf_protocol::ipc::{Event, Op};
use atf_protocol::run_models::RunStatus;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

const PAGE: usize = 10;

fn is_current(view: &WorkflowView, run_id: Uuid) -> bool {
    view.run_id == Some(run_id)
}

/// Apply one core event to the view. Events of a run other than the current
/// one are dropped.
pub fn handle_core_event(view: &mut WorkflowView, event: Event) {
    match event {
        Event::RunStarted { run_id, input } => {
            view.clear_run();
            view.run_id = Some(run_id);
            view.input = Some(input);
            view.status = RunStatus::Running;
        }
        Event::RunStatusUpdate {
            run_id,
            status,
            current_agent_id,
        } if is_current(view, run_id) => {
            view.status = status;
            view.current_agent_id = current_agent_id;
        }
        Event::SessionMessage { run_id, message } if is_current(view, run_id) => {
            view.log.append(message);
        }
        Event::AgentCompleted { run_id, agent_id } if is_current(view, run_id) => {
            if !view.completed_agent_ids.contains(&agent_id) {
                view.completed_agent_ids.push(agent_id);
            }
        }
        Event::GateOpened { run_id, request } if is_current(view, run_id) => {
            view.pending_gate = Some(request);
        }
        Event::GateResolved { run_id, gate_id, .. } if is_current(view, run_id) => {
            if view.pending_gate.as_ref().is_some_and(|g| g.id == gate_id) {
                view.pending_gate = None;
            }
        }
        Event::RunCompleted { run_id } if is_current(view, run_id) => {
            view.status = RunStatus::Completed;
            view.pending_gate = None;
        }
        Event::RunAborted { run_id } if is_current(view, run_id) => {
            view.status = RunStatus::Aborted;
            view.pending_gate = None;
        }
        Event::RunFailed { run_id, error } if is_current(view, run_id) => {
            view.status = RunStatus::Failed;
            view.error = Some(error);
            view.pending_gate = None;
        }
        Event::RunReset => {
            view.clear_run();
        }
        Event::ChatMessage { message } => {
            if message.role == ChatRole::Assistant {
                view.chat_waiting = false;
            }
            view.chat.push(message);
        }
        Event::OperationRejected { reason } => {
            view.chat_waiting = false;
            view.notice = Some(reason);
        }
        _ => {}
    }
}

fn send(op_tx: &UnboundedSender<Op>, op: Op) {
    let _ = op_tx.send(op);
}

/// Handle a keyboard event from the user.
///
/// Returns `true` if the application should exit.
pub fn handle_keyboard_event(
    key_event: KeyEvent,
    input: &mut InputState,
    log_view: &mut SessionLogView,
    view: &mut WorkflowView,
    op_tx: &UnboundedSender<Op>,
) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key_event.code == KeyCode::Char('c') {
        return true;
    }

    // The confirmation popup is modal.
    if let Some(request) = &view.pending_gate {
        let proceed = match key_event.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
            _ => None,
        };
        if let Some(proceed) = proceed {
            send(
                op_tx,
                Op::ResolveGate {
                    gate_id: request.id,
                    proceed,
                },
            );
        }
        return false;
    }

    if ctrl && key_event.code == KeyCode::Char('r') {
        view.notice = None;
        log_view.follow_tail();
        send(op_tx, Op::ResetWorkflow);
        return false;
    }

    match key_event.code {
        KeyCode::Tab | KeyCode::BackTab => input.toggle_focus(),
        KeyCode::Up => log_view.scroll_up(),
        KeyCode::Down => log_view.scroll_down(),
        KeyCode::PageUp => log_view.page_up(PAGE),
        KeyCode::PageDown => log_view.page_down(PAGE),
        KeyCode::Esc => {
            if input.focused().is_empty() {
                return true;
            }
            input.focused_mut().clear();
        }
        KeyCode::Enter => submit(input, log_view, view, op_tx),
        _ => {
            input.focused_mut().handle_key_event(key_event);
        }
    }

    false
}

/// Enter in the file field starts a run; in the chat field it sends the
/// message.
fn submit(
    input: &mut InputState,
    log_view: &mut SessionLogView,
    view: &mut WorkflowView,
    op_tx: &UnboundedSender<Op>,
) {
    view.notice = None;
    match input.focus {
        Focus::File => {
            log_view.follow_tail();
            send(
                op_tx,
                Op::StartWorkflow {
                    input: input.file.input().trim().to_string(),
                },
            );
        }
        Focus::Chat => {
            if input.chat.input().trim().is_empty() {
                return;
            }
            view.chat_waiting = true;
            send(
                op_tx,
                Op::SendChat {
                    message: input.chat.take(),
                },
            );
        }
    }
}
