//! Engram - external memory for coding-assistant sessions.
//!
//! Main entry point for the Engram CLI.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use engram_memory::{MemoryConfig, MemoryError, MemoryManager};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout is reserved for operation
    // output consumed by the invoking hook.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let base_dir = match cli.work_dir.clone() {
        Some(dir) => dir,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                error!("Failed to resolve working directory: {}", e);
                println!("{}", failure_message(&cli.command));
                return ExitCode::FAILURE;
            }
        },
    };

    // The timeout is the caller's bound, not the library's: the core
    // performs no retries and no timing of its own.
    let bound = Duration::from_secs(cli.timeout_secs);
    match tokio::time::timeout(bound, run(&cli.command, base_dir)).await {
        Ok(Ok(output)) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!("{}", e);
            println!("{}", failure_message(&cli.command));
            ExitCode::FAILURE
        }
        Err(_) => {
            error!("Operation timed out after {}s", cli.timeout_secs);
            println!("{}", failure_message(&cli.command));
            ExitCode::FAILURE
        }
    }
}

async fn run(command: &Commands, base_dir: PathBuf) -> Result<String, MemoryError> {
    let config = MemoryConfig::with_base_dir(base_dir);
    let manager = MemoryManager::new(&config).await?;

    match command {
        Commands::Load => manager.load().await,
        Commands::Save { payload_file } => {
            let payload = match payload_file {
                Some(arg) => Some(read_payload(arg).await?),
                None => None,
            };
            manager.save(payload.as_deref()).await
        }
        Commands::Clear => manager.clear().await,
        Commands::Stats => manager.stats().await,
        Commands::AddTask { description, priority } => {
            manager.add_task(description, priority).await
        }
    }
}

/// Read a save payload from the referenced file. A leading '@' (the
/// convention the invoking hook scripts use) is stripped. The payload
/// travels through a file rather than an inline argument to avoid
/// shell-escaping hazards.
async fn read_payload(arg: &str) -> Result<String, MemoryError> {
    let path = arg.strip_prefix('@').unwrap_or(arg);
    tokio::fs::read_to_string(path)
        .await
        .map_err(MemoryError::Read)
}

/// Human-readable failure string per command, mirroring what the host
/// hook reports back to the session.
fn failure_message(command: &Commands) -> &'static str {
    match command {
        Commands::Load => "Failed to load memory",
        Commands::Save { .. } => "Failed to save memory",
        Commands::Clear => "Failed to clear memory",
        Commands::Stats => "Failed to get stats",
        Commands::AddTask { .. } => "Failed to add task",
    }
}
