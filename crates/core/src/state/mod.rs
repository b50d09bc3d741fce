//! Workflow run state.
//!
//! - [`run`]: state transitions of a single run, each emitting an event
//! - [`manager`]: `WorkflowManager`, the handle front ends talk to

pub mod manager;
pub mod run;
