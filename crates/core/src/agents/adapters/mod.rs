//! Agent adapter implementations.

pub mod mock_agent;
mod narrated;

pub use mock_agent::MockAgent;
pub use narrated::NarratedAgent;
