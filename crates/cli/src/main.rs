//! Command-line tools for sheet documents.
//!
//! Run with: `sheet <command> <file>`

mod commands;
mod config;
mod dirs;

use anyhow::Result;
use clap::Parser;
use commands::{Inspect, Totals, Upgrade};
use std::path::PathBuf;

/// Inspect, upgrade and total character-sheet documents
#[derive(Parser)]
#[command(name = "sheet")]
#[command(about = "Tools for character-sheet documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to $SHEET_CONFIG, then the platform config dir)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Show the rows of a document
    Inspect(Inspect),

    /// Rewrite a document at the current schema version
    Upgrade(Upgrade),

    /// Compute adjusted costs and feature bonuses
    Totals(Totals),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for SHEET_CONFIG and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Inspect(cmd) => cmd.execute(&config),
        Command::Upgrade(cmd) => cmd.execute(&config),
        Command::Totals(cmd) => cmd.execute(&config),
    }
}
