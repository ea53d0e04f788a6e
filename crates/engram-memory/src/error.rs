//! Memory errors.

use thiserror::Error;

/// Memory error types.
///
/// Absence of the memory file is not an error anywhere in this crate;
/// it is the normal first-run state.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// I/O fault reading the memory file, other than absence.
    #[error("Failed to read memory: {0}")]
    Read(#[source] std::io::Error),

    /// Malformed JSON, either on disk or in a save payload.
    #[error("Invalid memory JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// I/O fault writing the memory file.
    #[error("Failed to write memory: {0}")]
    Write(#[source] std::io::Error),

    /// I/O fault writing an archive entry.
    #[error("Failed to archive memory: {0}")]
    Archive(#[source] std::io::Error),

    /// Document failed to serialize.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
