//! Common test utilities shared by the integration tests.
//!
//! - Fixtures (descriptor sets, settings, `.atf/` projects)
//! - Event assertions
//! - An in-process HTTP backend

pub mod assertions;
pub mod fixtures;
pub mod mock_server;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_server::*;
