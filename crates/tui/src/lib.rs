//! # atf-tui
//!
//! Terminal user interface for the ATF workflow.
//!
//! The UI never calls the engine directly: it sends `Op`s to a
//! `WorkflowManager` task and redraws from the `Event`s it gets back.

pub mod app;
pub mod event;
pub mod event_handler;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use tui::Tui;

use anyhow::Result;
use atf_core::agents::AgentManager;
use atf_core::backend::{Backend, HttpBackend};
use atf_core::config::load_config;
use atf_core::engine::WorkflowEngine;
use atf_core::state::manager::WorkflowManager;
use atf_protocol::ipc::Op;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;

/// Load `.atf/` under `root`, start the core and run the UI until the user
/// quits. `backend_url` overrides the configured backend.
pub async fn run_app(root: &Path, backend_url: Option<String>) -> Result<()> {
    let config = load_config(root).await?.with_backend_url(backend_url);
    let backend = Arc::new(HttpBackend::new(&config.global.backend_url)?);

    // Display only; the UI works without it.
    let output_path = backend.output_paths().await.ok().map(|paths| paths.output_path);

    let engine = WorkflowEngine::new(
        AgentManager::new(config.agents.clone()),
        backend,
        config.global.clone(),
    );
    let (op_tx, op_rx) = unbounded_channel();
    let (event_tx, event_rx) = unbounded_channel();
    let core = tokio::spawn(WorkflowManager::new(engine, event_tx).serve(op_rx));

    let mut app = App::new(config, op_tx.clone(), event_rx).with_output_path(output_path);
    let mut tui = Tui::init()?;
    let result = app.run(&mut tui).await;
    tui.restore()?;

    let _ = op_tx.send(Op::Shutdown);
    drop(app);
    let _ = core.await;
    result
}
