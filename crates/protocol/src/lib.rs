//! # atf-protocol
//!
//! Core protocol definitions and data models for the ATF workflow kit.
//!
//! This crate defines all shared data structures used for:
//! - Agent descriptors (loaded from `.atf/agents/*.md` or built-in defaults)
//! - Runtime workflow state and the session log
//! - Gate requests raised at checkpoints
//! - Inter-process communication between the TUI and the core
//!
//! ## Modules
//!
//! - [`agent_models`]: Agent descriptor structures
//! - [`config_models`]: Global configuration from config.toml
//! - [`session_models`]: Session log messages
//! - [`run_models`]: Workflow run state, status, and normalized results
//! - [`gate_models`]: Checkpoint confirmation requests
//! - [`chat_models`]: Conversational log entries
//! - [`ipc`]: Operations and Events for Core-TUI communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde, ts-rs, uuid, and chrono
//! - TypeScript generation: all types derive `TS` for web client compatibility
//! - Independent compilation: no dependencies on other workspace crates

pub mod agent_models;
pub mod chat_models;
pub mod config_models;
pub mod gate_models;
pub mod ipc;
pub mod run_models;
pub mod session_models;

// Re-export all public types for convenience
pub use agent_models::*;
pub use chat_models::*;
pub use config_models::*;
pub use gate_models::*;
pub use ipc::*;
pub use run_models::*;
pub use session_models::*;
