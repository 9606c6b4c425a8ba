//! CLI module for Kort.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Kort - YouTube Video Summarization
///
/// Summarize one or more YouTube videos into a single AI-written digest.
/// The name "Kort" comes from the Norwegian/Scandinavian word for "short."
#[derive(Parser, Debug)]
#[command(name = "kort")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize one or more YouTube videos (up to 5)
    Summarize {
        /// YouTube URLs or video IDs
        #[arg(required = true)]
        urls: Vec<String>,

        /// LLM model to use for summary generation
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the current configuration to the config file
    Init,
}
