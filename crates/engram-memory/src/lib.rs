//! # Engram Memory
//!
//! Persistence and archival for a session memory document.
//!
//! ## Features
//!
//! - Single JSON memory document, atomically replaced on every save
//! - Timestamped append-only archive of cleared documents
//! - Absent memory is silently treated as the empty state

pub mod archive;
pub mod config;
pub mod document;
pub mod error;
pub mod manager;
pub mod render;
pub mod store;

pub use archive::ArchiveManager;
pub use config::MemoryConfig;
pub use document::{MemoryDocument, MemoryStats};
pub use error::MemoryError;
pub use manager::MemoryManager;
pub use store::{LoadOutcome, MemoryStore};
