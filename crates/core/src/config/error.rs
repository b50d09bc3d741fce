//! Errors raised while loading `.atf/`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `.atf/config.toml` is not valid TOML or has a field of the wrong type.
    #[error("Invalid workflow settings in {path}: {source}")]
    Settings {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Cannot list agent files in {path}: {source}")]
    AgentsDir {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Agent file {path} has no YAML front matter")]
    MissingFrontMatter { path: PathBuf },

    /// Front matter present but not a usable agent descriptor.
    #[error("Agent file {path} has an unusable front matter: {reason}")]
    AgentFrontMatter { path: PathBuf, reason: String },

    #[error("Agent id {id} is defined twice, in {first} and {second}")]
    DuplicateAgentId {
        id: u32,
        first: PathBuf,
        second: PathBuf,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
