//! Memory configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Memory storage configuration.
///
/// All paths are relative to the working directory of the session, so
/// every project carries its own memory file and archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Project root the memory file lives in.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// File name of the memory document, relative to `base_dir`.
    #[serde(default = "default_memory_file")]
    pub memory_file: String,

    /// Directory name for archived documents, relative to `base_dir`.
    #[serde(default = "default_history_dir")]
    pub history_dir: String,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_memory_file() -> String {
    ".engram.json".to_string()
}

fn default_history_dir() -> String {
    ".engram_history".to_string()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            memory_file: default_memory_file(),
            history_dir: default_history_dir(),
        }
    }
}

impl MemoryConfig {
    /// Config rooted at the given working directory.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Full path of the memory document.
    pub fn memory_path(&self) -> PathBuf {
        self.base_dir.join(&self.memory_file)
    }

    /// Full path of the archive directory.
    pub fn history_path(&self) -> PathBuf {
        self.base_dir.join(&self.history_dir)
    }
}
