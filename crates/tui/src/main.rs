//! Standalone `atf-tui` binary; `atf` without a subcommand runs the same UI.

use anyhow::Result;
use atf_tui::run_app;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    run_app(Path::new("."), std::env::var("ATF_BACKEND_URL").ok()).await
}
