//! rlbook CLI - Command line interface for rlbook
//!
//! Runs the demonstrations of the textbook algorithms: the simple bandit on
//! the ten-armed testbed and iterative policy evaluation on the gridworld.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{bandit, evaluate};

#[derive(Parser)]
#[command(name = "rlbook")]
#[command(author, version, about = "rlbook - Reinforcement Learning: An Introduction algorithms", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file to use
    #[arg(short, long, global = true, env = "RLBOOK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simple bandit algorithm on a testbed (Ctrl-C to end)
    Bandit(bandit::BanditArgs),

    /// Run iterative policy evaluation on the gridworld
    Evaluate(evaluate::EvaluateArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(commands::config::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::Config::load_from(Some(path))?,
        None => config::Config::load()?,
    };

    // Initialize logging based on verbosity
    let log_level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("rlbook={log_level},rlbook_core={log_level},rlbook_rl={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("rlbook v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Bandit(args) => bandit::run(args, &config.bandit).await,
        Commands::Evaluate(args) => evaluate::run(args, &config.evaluation).await,
        Commands::Config(cmd) => commands::config::run(cmd, &config).await,
    };

    if let Err(e) = &result {
        if e
            .downcast_ref::<rlbook_core::RlError>()
            .is_some_and(rlbook_core::RlError::is_config)
        {
            error!("Invalid configuration: {}", e);
        }
    }

    result
}
