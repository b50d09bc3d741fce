//! Widgets of the workflow screen.

pub mod chat;
pub mod composer;
pub mod gate_popup;
pub mod pipeline;
pub mod session_log;

pub use composer::Composer;
pub use session_log::SessionLogView;
