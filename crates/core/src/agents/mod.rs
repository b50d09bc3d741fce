//! Agent abstraction and management.
//!
//! This module provides the `Agent` trait (Adapter Pattern), the built-in
//! agent catalog, and the `AgentManager` that pairs descriptors with the
//! implementations that run them.

pub mod adapters;
pub mod base;
pub mod catalog;
pub mod manager;

pub use adapters::{MockAgent, NarratedAgent};
pub use base::{Agent, AgentError, AgentEvent, AgentEventStream, ExecutionContext};
pub use catalog::{default_descriptors, step_number};
pub use manager::AgentManager;
