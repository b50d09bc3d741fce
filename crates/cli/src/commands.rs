//! Headless subcommands.

use crate::render::{agent_row, session_line};
use atf_core::agents::{step_number, AgentManager};
use atf_core::backend::{Backend, HttpBackend};
use atf_core::chat::ChatSession;
use atf_core::config::{load_config, AppConfig};
use atf_core::engine::WorkflowEngine;
use atf_core::state::manager::WorkflowManager;
use atf_protocol::config_models::Pacing;
use atf_protocol::ipc::Event;
use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::Result;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

async fn config(root: &Path, backend_url: Option<String>) -> Result<AppConfig> {
    let config = load_config(root)
        .await
        .wrap_err_with(|| format!("Failed to load configuration from {}", root.display()))?;
    Ok(config.with_backend_url(backend_url))
}

fn http_backend(config: &AppConfig) -> Result<Arc<HttpBackend>> {
    tracing::debug!(backend_url = %config.global.backend_url, "using backend");
    Ok(Arc::new(HttpBackend::new(&config.global.backend_url)?))
}

/// Ask `prompt` on stdin. Anything but `y`/`yes` (or EOF) means no.
async fn ask(prompt: &str) -> Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{} {} ", prompt.bold(), "[y/N]".dimmed()).as_bytes())
        .await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn print_event(manager: &WorkflowManager, event: Event, answer: Option<bool>) -> Result<()> {
    match event {
        Event::SessionMessage { message, .. } => println!("{}", session_line(&message)),
        Event::GateOpened { request, .. } => {
            let proceed = match answer {
                Some(proceed) => {
                    println!("{} {}", request.prompt.bold(), if proceed { "yes" } else { "no" });
                    proceed
                }
                None => ask(&request.prompt).await?,
            };
            manager.resolve_gate(request.id, proceed);
        }
        _ => {}
    }
    Ok(())
}

/// `atf run <file>`
pub async fn run(
    root: &Path,
    backend_url: Option<String>,
    file: &str,
    answer: Option<bool>,
    fast: bool,
) -> Result<()> {
    let mut config = config(root, backend_url).await?;
    if fast {
        config.global.pacing = Pacing::instant();
    }
    let backend = http_backend(&config)?;
    let engine = WorkflowEngine::new(AgentManager::new(config.agents), backend, config.global);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let manager = WorkflowManager::new(engine, events_tx);

    let runner = manager.clone();
    let input = file.to_string();
    let mut run_task = tokio::spawn(async move { runner.run_to_completion(&input).await });

    let (run, result) = loop {
        tokio::select! {
            Some(event) = events_rx.recv() => print_event(&manager, event, answer).await?,
            outcome = &mut run_task => break outcome?,
        }
    };
    while let Ok(event) = events_rx.try_recv() {
        print_event(&manager, event, answer).await?;
    }

    result?;
    println!("{} {}", "Run".bold(), format!("{:?}", run.status).to_lowercase());
    Ok(())
}

/// `atf agents`
pub async fn agents(root: &Path, json: bool) -> Result<()> {
    let config = config(root, None).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config.agents)?);
        return Ok(());
    }

    for descriptor in &config.agents {
        let step = step_number(&config.agents, descriptor.id, config.global.step_numbering);
        println!("{}", agent_row(step, descriptor));
    }
    Ok(())
}

/// `atf chat <message>`
pub async fn chat(
    root: &Path,
    backend_url: Option<String>,
    message: &str,
    file: Option<&str>,
) -> Result<()> {
    let config = config(root, backend_url).await?;
    let mut session = ChatSession::new(http_backend(&config)?);

    let Some(reply) = session.send(message, file, None).await else {
        bail!("Nothing to send: the message is blank");
    };
    if reply.is_error {
        return Err(eyre!(reply.content));
    }
    println!("{}", reply.content);
    Ok(())
}

/// `atf output-path`
pub async fn output_path(root: &Path, backend_url: Option<String>, json: bool) -> Result<()> {
    let config = config(root, backend_url).await?;
    let paths = http_backend(&config)?.output_paths().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        println!("{}", paths.output_path);
    }
    Ok(())
}
