//! `atf` command-line entry point.
//!
//! Without a subcommand the interactive TUI is launched; the subcommands run
//! the workflow and its helpers headless.

mod commands;
mod render;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ATF workflow kit: drive the ATF testing agents from the terminal
#[derive(Parser)]
#[command(name = "atf", version, about)]
pub struct Cli {
    /// Base URL of the ATF backend
    #[arg(long, env = "ATF_BACKEND_URL", global = true)]
    backend_url: Option<String>,

    /// Project root containing the `.atf/` directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the workflow for an uploaded file
    Run {
        /// Name of the uploaded requirement document
        file: String,
        /// Proceed at the confirmation checkpoint without asking
        #[arg(long, conflicts_with = "no")]
        yes: bool,
        /// Stop at the confirmation checkpoint without asking
        #[arg(long)]
        no: bool,
        /// Skip the narration pauses between steps
        #[arg(long)]
        fast: bool,
    },

    /// List the configured agents
    Agents {
        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the assistant a question about a file
    Chat {
        message: String,
        /// File the question is about
        #[arg(long)]
        file: Option<String>,
    },

    /// Print the backend output directories
    OutputPath {
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("atf_core=info,atf_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return atf_tui::run_app(&cli.root, cli.backend_url)
            .await
            .map_err(|e| color_eyre::eyre::eyre!(e));
    };

    init_tracing();
    match command {
        Commands::Run { file, yes, no, fast } => {
            let answer = match (yes, no) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::run(&cli.root, cli.backend_url, &file, answer, fast).await
        }
        Commands::Agents { json } => commands::agents(&cli.root, json).await,
        Commands::Chat { message, file } => {
            commands::chat(&cli.root, cli.backend_url, &message, file.as_deref()).await
        }
        Commands::OutputPath { json } => commands::output_path(&cli.root, cli.backend_url, json).await,
    }
}
