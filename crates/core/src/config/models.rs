//! Aggregated configuration.

use crate::agents::catalog::default_descriptors;
use atf_protocol::agent_models::AgentDescriptor;
use atf_protocol::config_models::GlobalConfig;

/// Everything loaded from the `.atf/` directory.
///
/// # Example
///
/// ```rust,no_run
/// use atf_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("{} agents, backend at {}", config.agents.len(), config.global.backend_url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Settings from `config.toml`.
    pub global: GlobalConfig,

    /// Agent descriptors in ascending id order.
    pub agents: Vec<AgentDescriptor>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            agents: default_descriptors(),
        }
    }
}

impl AppConfig {
    /// Override the backend URL (command line or environment).
    pub fn with_backend_url(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url {
            self.global.backend_url = url;
        }
        self
    }
}
