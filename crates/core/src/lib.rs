//! # atf-core
//!
//! Workflow orchestration engine for ATF Workflow Kit.
//!
//! This crate provides:
//! - Configuration loading from the `.atf/` directory
//! - Agent abstraction and the simulated narrated agents
//! - The workflow engine with its checkpoint gate
//! - Normalization of backend agent payloads
//! - The HTTP backend client and the chat assistant session
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading
//! - [`agents`]: Agent trait, catalog and manager
//! - [`engine`]: Sequential workflow engine
//! - [`gate`]: One-shot confirmation gate
//! - [`normalizer`]: Layered extraction of agent payloads
//! - [`backend`]: Backend trait, HTTP client and mock
//! - [`chat`]: Conversational assistant log
//! - [`state`]: Run state transitions and the `WorkflowManager`

pub mod agents;
pub mod backend;
pub mod chat;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod normalizer;
pub mod state;

pub use error::{WorkflowError, WorkflowResult};
