//! Configuration file loader for the `.atf/` directory.
//!
//! ```text
//! .atf/
//! ├── config.toml        global settings and pacing
//! └── agents/
//!     ├── 1-requirements.md
//!     └── ...            one descriptor per file
//! ```
//!
//! An agent file carries the descriptor in YAML front matter; every `- `
//! bullet in the Markdown body becomes a narration line.

use crate::agents::catalog::default_descriptors;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::AppConfig;
use atf_protocol::agent_models::AgentDescriptor;
use atf_protocol::config_models::GlobalConfig;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the configuration directory under the project root.
pub const CONFIG_DIR: &str = ".atf";

/// Loads all configuration from the `.atf/` directory under `root`.
///
/// Missing pieces fall back to defaults: no `config.toml` gives
/// [`GlobalConfig::default`], no `agents/` directory gives the built-in
/// seven-agent catalog.
///
/// # Errors
///
/// Returns `ConfigError` if a file exists but cannot be read or parsed, or if
/// two agent files share an id.
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let atf_dir = root.join(CONFIG_DIR);

    if !atf_dir.exists() {
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&atf_dir)?;
    let agents = load_agents(&atf_dir)?;

    tracing::debug!(dir = %atf_dir.display(), agents = agents.len(), "configuration loaded");
    Ok(AppConfig { global, agents })
}

fn load_global_config(atf_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = atf_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;

    toml::from_str(&content).map_err(|source| ConfigError::Settings {
        path: config_path,
        source,
    })
}

/// Bullet lines of a Markdown body, without the marker.
fn narration_lines(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| line.trim_start().strip_prefix("- "))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn load_agents(atf_dir: &Path) -> ConfigResult<Vec<AgentDescriptor>> {
    let agents_dir = atf_dir.join("agents");

    if !agents_dir.exists() {
        return Ok(default_descriptors());
    }

    let matter = Matter::<YAML>::new();
    let mut agents: Vec<AgentDescriptor> = Vec::new();
    let mut seen: HashMap<u32, PathBuf> = HashMap::new();

    for entry in WalkDir::new(&agents_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::AgentsDir {
            path: agents_dir.clone(),
            source,
        })?;

        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let result = matter.parse(&content);
        let mut descriptor: AgentDescriptor = result
            .data
            .ok_or_else(|| ConfigError::MissingFrontMatter {
                path: path.to_path_buf(),
            })?
            .deserialize()
            .map_err(|e| ConfigError::AgentFrontMatter {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let narration = narration_lines(&result.content);
        if !narration.is_empty() {
            descriptor.narration = narration;
        }

        if let Some(first) = seen.get(&descriptor.id) {
            return Err(ConfigError::DuplicateAgentId {
                id: descriptor.id,
                first: first.clone(),
                second: path.to_path_buf(),
            });
        }
        seen.insert(descriptor.id, path.to_path_buf());
        agents.push(descriptor);
    }

    agents.sort_by_key(|descriptor| descriptor.id);
    Ok(agents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atf_protocol::config_models::StepNumbering;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_config_full() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let atf_dir = root.join(CONFIG_DIR);
        fs::create_dir_all(atf_dir.join("agents")).expect("Failed to create agents dir");

        let config_toml = r#"
backend_url = "http://atf.internal:9000"
step_numbering = "enabled"

[pacing]
narration_step_ms = 10
"#;
        fs::write(atf_dir.join("config.toml"), config_toml).expect("Failed to write config.toml");

        let agent_md = r#"---
id: 4
name: Test Data Generation Agent
description: Outputs structured JSON test data for test cases.
checkpoint-after: true
result-key: 4_test_data_generator
list-field: test_data
---

While running this agent reports:

- Generating test data sets...
- Creating realistic test data values...
"#;
        fs::write(atf_dir.join("agents/4-test-data.md"), agent_md)
            .expect("Failed to write agent file");
        fs::write(
            atf_dir.join("agents/1-requirements.md"),
            "---\nid: 1\nname: Requirement Analysis Agent\n---\n",
        )
        .expect("Failed to write agent file");

        let config = load_config(root).await.expect("Failed to load config");

        assert_eq!(config.global.backend_url, "http://atf.internal:9000");
        assert_eq!(config.global.step_numbering, StepNumbering::Enabled);
        assert_eq!(config.global.pacing.narration_step_ms, 10);
        assert_eq!(config.global.pacing.agent_start_ms, 800);
        assert_eq!(config.global.workflow_name, "ATF Workflow");

        let ids: Vec<u32> = config.agents.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 4]);
        let agent = &config.agents[1];
        assert!(agent.enabled);
        assert!(agent.checkpoint_after);
        assert_eq!(agent.result_key.as_deref(), Some("4_test_data_generator"));
        assert_eq!(agent.list_field.as_deref(), Some("test_data"));
        assert_eq!(
            agent.narration,
            vec![
                "Generating test data sets...".to_string(),
                "Creating realistic test data values...".to_string()
            ]
        );
        assert!(config.agents[0].narration.is_empty());
    }

    #[tokio::test]
    async fn test_load_config_missing_directory_uses_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");

        let config = load_config(dir.path())
            .await
            .expect("Should handle missing .atf");

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.agents.len(), 7);
        assert_eq!(config.global.backend_url, "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_load_config_partial() {
        let dir = tempdir().expect("Failed to create temp dir");
        let atf_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&atf_dir).expect("Failed to create .atf");
        fs::write(atf_dir.join("config.toml"), "workflow_name = \"Nightly\"")
            .expect("Failed to write config.toml");

        let config = load_config(dir.path())
            .await
            .expect("Should handle partial config");

        assert_eq!(config.global.workflow_name, "Nightly");
        assert_eq!(config.agents.len(), 7, "Missing agents/ falls back to the catalog");
    }

    #[tokio::test]
    async fn test_load_config_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let atf_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&atf_dir).expect("Failed to create .atf");
        fs::write(atf_dir.join("config.toml"), "backend_url = [unclosed")
            .expect("Failed to write config.toml");

        let result = load_config(dir.path()).await;
        assert!(matches!(result, Err(ConfigError::Settings { path, .. }) if path.ends_with("config.toml")));
    }

    #[tokio::test]
    async fn test_load_config_agent_without_front_matter() {
        let dir = tempdir().expect("Failed to create temp dir");
        let agents_dir = dir.path().join(CONFIG_DIR).join("agents");
        fs::create_dir_all(&agents_dir).expect("Failed to create agents dir");
        fs::write(agents_dir.join("plain.md"), "Just plain markdown content")
            .expect("Failed to write agent file");

        let result = load_config(dir.path()).await;

        match result {
            Err(err @ ConfigError::MissingFrontMatter { .. }) => {
                assert!(err.to_string().contains("plain.md"));
                assert!(err.to_string().ends_with("has no YAML front matter"));
            }
            other => panic!("Expected MissingFrontMatter error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_config_agent_missing_id() {
        let dir = tempdir().expect("Failed to create temp dir");
        let agents_dir = dir.path().join(CONFIG_DIR).join("agents");
        fs::create_dir_all(&agents_dir).expect("Failed to create agents dir");
        fs::write(agents_dir.join("x.md"), "---\nname: No Id\n---\n")
            .expect("Failed to write agent file");

        let result = load_config(dir.path()).await;
        assert!(
            matches!(result, Err(ConfigError::AgentFrontMatter { path, .. }) if path.ends_with("x.md"))
        );
    }

    #[tokio::test]
    async fn test_load_config_duplicate_ids() {
        let dir = tempdir().expect("Failed to create temp dir");
        let agents_dir = dir.path().join(CONFIG_DIR).join("agents");
        fs::create_dir_all(&agents_dir).expect("Failed to create agents dir");
        for file in ["a.md", "b.md"] {
            fs::write(agents_dir.join(file), "---\nid: 2\nname: Twin\n---\n")
                .expect("Failed to write agent file");
        }

        let result = load_config(dir.path()).await;
        match result {
            Err(ConfigError::DuplicateAgentId { id, first, second }) => {
                assert_eq!(id, 2);
                assert!(first.ends_with("a.md"));
                assert!(second.ends_with("b.md"));
            }
            other => panic!("Expected DuplicateAgentId error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_config_ignores_non_markdown() {
        let dir = tempdir().expect("Failed to create temp dir");
        let agents_dir = dir.path().join(CONFIG_DIR).join("agents");
        fs::create_dir_all(&agents_dir).expect("Failed to create agents dir");
        fs::write(agents_dir.join("readme.txt"), "Not a markdown file")
            .expect("Failed to write txt file");
        fs::write(agents_dir.join("one.md"), "---\nid: 1\nname: Only\n---\n")
            .expect("Failed to write agent file");

        let config = load_config(dir.path()).await.expect("Should ignore other files");
        assert_eq!(config.agents.len(), 1);
    }

    #[test]
    fn test_narration_lines() {
        let body = "Intro text\n\n- first\n  - nested\n-not a bullet\n- \n";
        assert_eq!(narration_lines(body), vec!["first".to_string(), "nested".to_string()]);
    }
}
