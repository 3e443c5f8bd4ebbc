//! inbox-cli - terminal viewer for an SMS gateway's incoming messages
//!
//! Loads `/api/incoming/` once and shows the records in a paginated table.
//! A second tab shows the outgoing log with delivery statistics.

mod api;
mod config;
mod models;
mod table;
mod tui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "inbox-cli")]
#[command(about = "Terminal viewer for an SMS gateway's incoming messages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Gateway dashboard URL (overrides the config file)
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Path to config file (default: platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal user interface (default)
    Tui,

    /// Print incoming messages, newest first
    List {
        /// Maximum number of messages to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print the outgoing log with delivery statistics instead
        #[arg(long)]
        outgoing: bool,
    },

    /// Show the effective configuration
    Config,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(ref server) = cli.server {
        config.server_url = server.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Commands::Tui);

    // Initialize logging. In TUI mode log lines go to the debug pane.
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());
    let logs = tui::LogRing::new();
    if matches!(command, Commands::Tui) {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(logs.clone()),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    let config = load_config(&cli)?;

    match command {
        Commands::Tui => {
            tracing::info!("Starting TUI against {}", config.server_url);
            tui::run(config, logs).await?;
        }
        Commands::List { limit, outgoing: false } => {
            tracing::info!("Fetching incoming messages...");
            api::list_incoming(&config, limit).await?;
        }
        Commands::List { limit, outgoing: true } => {
            tracing::info!("Fetching outgoing log...");
            api::list_outgoing(&config, limit).await?;
        }
        Commands::Config => {
            let path = match cli.config {
                Some(ref p) => p.clone(),
                None => Config::config_path()?,
            };
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
