//! Sprout CLI - Gamified sustainability challenge tracker
//!
//! Usage:
//!   sprout serve --port 8000        Start the web server
//!   sprout recommend -a "1=1,2=-1"  Score an answer vector
//!   sprout profile                  Show the seed profile summary

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose; without either, stay at info.
    let fallback_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.data_dir, &host, port, static_dir.as_deref()).await,
        Commands::Recommend { answers, reasons } => {
            commands::cmd_recommend(&cli.data_dir, &answers, reasons)
        }
        Commands::Profile => commands::cmd_profile(&cli.data_dir),
    }
}
