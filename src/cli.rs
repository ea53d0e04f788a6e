//! CLI definitions for Engram.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Engram CLI.
#[derive(Parser)]
#[command(name = "engram")]
#[command(about = "External memory for coding-assistant sessions")]
#[command(version)]
pub(crate) struct Cli {
    /// Working directory holding the memory file
    #[arg(short, long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Operation timeout in seconds
    #[arg(long, global = true, default_value_t = 5)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the stored memory, rendered for context injection
    Load,

    /// Persist a memory document, or refresh the current timestamp
    Save {
        /// Path to a file containing the JSON payload; a leading '@'
        /// is accepted. The payload is never passed inline.
        payload_file: Option<String>,
    },

    /// Archive the current memory and reset it to the empty state
    Clear,

    /// Print a JSON summary of the stored memory
    Stats,

    /// Append a task to the active task list
    AddTask {
        /// Task description
        description: String,

        /// Task priority
        #[arg(long, default_value = "medium")]
        priority: String,
    },
}
