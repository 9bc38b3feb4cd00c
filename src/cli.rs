use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "webmforge")]
#[command(author, version, about = "Turn tagged audio and a cover into a size-limited WebM")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an audio file (and optional cover image) to WebM
    Convert {
        /// Audio file, optionally followed or preceded by a cover image
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Continue without a cover instead of asking
        #[arg(short, long)]
        yes: bool,

        /// Never prompt; a missing duration becomes an error
        #[arg(long)]
        non_interactive: bool,

        /// Wait for Enter before exiting on error
        #[arg(long)]
        pause_on_error: bool,
    },

    /// Probe an audio file and display information
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a cover of the given size would be scaled
    PlanScale {
        width: u32,
        height: u32,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
