//! Assertion helpers over events and runs.

#![allow(dead_code)]

use atf_protocol::ipc::Event;
use atf_protocol::run_models::{RunStatus, WorkflowRun};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

/// Receive events until `stop` matches one (inclusive) or `timeout` passes.
pub async fn collect_until(
    rx: &mut UnboundedReceiver<Event>,
    timeout: Duration,
    stop: impl Fn(&Event) -> bool,
) -> Vec<Event> {
    let mut events = Vec::new();
    let _ = tokio::time::timeout(timeout, async {
        while let Some(event) = rx.recv().await {
            let done = stop(&event);
            events.push(event);
            if done {
                break;
            }
        }
    })
    .await;
    events
}

pub fn is_terminal(event: &Event) -> bool {
    matches!(
        event,
        Event::RunCompleted { .. } | Event::RunAborted { .. } | Event::RunFailed { .. }
    )
}

/// Wait for the next gate and return its id.
pub async fn wait_for_gate(rx: &mut UnboundedReceiver<Event>) -> Uuid {
    let events = collect_until(rx, Duration::from_secs(5), |e| {
        matches!(e, Event::GateOpened { .. })
    })
    .await;
    match events.last() {
        Some(Event::GateOpened { request, .. }) => request.id,
        other => panic!("Expected GateOpened, got {other:?}"),
    }
}

pub fn status_updates(events: &[Event]) -> Vec<RunStatus> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::RunStatusUpdate { status, .. } => Some(*status),
            _ => None,
        })
        .collect()
}

/// Completed ids must be strictly increasing (and so duplicate-free).
pub fn assert_strictly_increasing(ids: &[u32]) {
    assert!(
        ids.windows(2).all(|pair| pair[0] < pair[1]),
        "Completed ids are not strictly increasing: {ids:?}"
    );
}

/// Every log entry of agent `names[k]` precedes every entry of `names[k + 1]`.
pub fn assert_agent_blocks_ordered(run: &WorkflowRun, names: &[&str]) {
    let positions: Vec<(usize, usize)> = names
        .iter()
        .filter_map(|name| {
            let indices: Vec<usize> = run
                .log
                .iter()
                .enumerate()
                .filter(|(_, m)| m.agent_name == *name)
                .map(|(i, _)| i)
                .collect();
            Some((*indices.first()?, *indices.last()?))
        })
        .collect();

    for pair in positions.windows(2) {
        assert!(
            pair[0].1 < pair[1].0,
            "Agent log blocks overlap: {positions:?}"
        );
    }
}

pub fn log_texts(run: &WorkflowRun) -> Vec<String> {
    run.log.iter().map(|m| m.text.clone()).collect()
}
