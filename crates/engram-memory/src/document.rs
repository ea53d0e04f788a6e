//! Memory document data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single memory document persisted between sessions.
///
/// Unknown fields in the on-disk JSON are dropped on parse, which
/// keeps the stored document within this schema across saves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
    /// Timestamp of the most recent save. Absent until first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    /// Free-form text describing current project state.
    #[serde(default)]
    pub project_context: String,

    /// Ordered task descriptors. Entries may be plain strings or
    /// objects with `description` / `added_at` / `priority`.
    #[serde(default)]
    pub active_tasks: Vec<serde_json::Value>,

    /// Ordered technical debt notes, strings or objects.
    #[serde(default)]
    pub technical_debt: Vec<serde_json::Value>,

    /// File path to note/summary object. Keys are unique.
    #[serde(default)]
    pub file_map: serde_json::Map<String, serde_json::Value>,
}

impl MemoryDocument {
    /// The canonical empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the document carries any content besides the timestamp.
    pub fn is_empty(&self) -> bool {
        self.project_context.is_empty()
            && self.active_tasks.is_empty()
            && self.technical_debt.is_empty()
            && self.file_map.is_empty()
    }
}

/// Read-only summary of the stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    /// Whether a memory file exists on disk.
    pub exists: bool,

    /// Size of the memory file in bytes (0 when absent).
    pub size_bytes: u64,

    /// Timestamp of the most recent save, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    /// Number of active tasks.
    pub active_tasks: usize,

    /// Number of technical debt entries.
    pub technical_debt: usize,

    /// Number of files tracked in the file map.
    pub files_tracked: usize,
}

impl MemoryStats {
    /// Stats for an absent document.
    pub fn absent() -> Self {
        Self {
            exists: false,
            size_bytes: 0,
            last_updated: None,
            active_tasks: 0,
            technical_debt: 0,
            files_tracked: 0,
        }
    }
}
