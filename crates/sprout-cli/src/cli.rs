//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sprout - Gamified sustainability challenges
#[derive(Parser)]
#[command(name = "sprout")]
#[command(about = "Gamified sustainability challenge tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory containing the catalog data files
    #[arg(long, default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Score an answer vector and print the ranked challenges
    Recommend {
        /// Answers as id=value pairs, e.g. "1=1,2=-1,6=1" (values -1, 0, 1)
        #[arg(short, long)]
        answers: String,

        /// Number of reasons to show per challenge
        #[arg(long, default_value = "3")]
        reasons: usize,
    },

    /// Show a summary of the seed profile
    Profile,
}
