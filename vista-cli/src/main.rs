//! Vista CLI - Command-line interface
//!
//! Browse the media catalog and manage favorites from the terminal.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use vista_core::VistaConfig;
use vista_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "vista")]
#[command(about = "Browse photos and videos and keep favorites")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn)]
    log_level: CliLogLevel,

    /// Directory for the full trace log, overrides VISTA_LOGS_DIR
    #[arg(long)]
    logs_dir: Option<PathBuf>,

    /// Use the built-in demo catalog instead of the Pexels API
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = VistaConfig::from_env();
    if let Some(logs_dir) = cli.logs_dir {
        config.logging.logs_dir = logs_dir;
    }

    init_tracing(cli.log_level.as_tracing_level(), &config.logging)
        .context("Failed to initialize logging")?;

    commands::handle_command(cli.command, config, cli.demo).await
}
