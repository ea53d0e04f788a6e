//! Archival of memory documents before destructive resets.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::debug;

use crate::document::MemoryDocument;
use crate::error::MemoryError;
use crate::store::write_atomic;

/// Append-only archive of memory documents.
///
/// One JSON file per archived document, keyed by capture timestamp
/// with millisecond resolution. Entries are never overwritten or
/// pruned; there is no retention policy.
pub struct ArchiveManager {
    history_dir: PathBuf,
}

impl ArchiveManager {
    /// Create an archive manager, ensuring the history directory
    /// exists.
    pub async fn new(history_dir: impl Into<PathBuf>) -> Result<Self, MemoryError> {
        let history_dir = history_dir.into();

        fs::create_dir_all(&history_dir)
            .await
            .map_err(MemoryError::Archive)?;

        debug!("ArchiveManager initialized at {:?}", history_dir);

        Ok(Self { history_dir })
    }

    /// The archive directory.
    pub fn dir(&self) -> &Path {
        &self.history_dir
    }

    /// Write `doc` unchanged to a new timestamped archive entry and
    /// return its path. The document's `last_updated` is not touched:
    /// the archive is a frozen copy.
    pub async fn archive(&self, doc: &MemoryDocument) -> Result<PathBuf, MemoryError> {
        let content = serde_json::to_string_pretty(doc).map_err(|e| {
            MemoryError::Serialization(format!("Failed to serialize archive entry: {}", e))
        })?;

        let path = self.next_entry_path().await;
        write_atomic(&path, &content).await.map_err(into_archive)?;

        debug!("Archived memory document to {:?}", path);
        Ok(path)
    }

    /// List archive entries, oldest first. Filenames embed the
    /// capture timestamp, so name order is time order.
    pub async fn list(&self) -> Result<Vec<PathBuf>, MemoryError> {
        let mut entries = fs::read_dir(&self.history_dir)
            .await
            .map_err(MemoryError::Read)?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(MemoryError::Read)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Pick an entry path that does not collide with an existing one.
    /// Repeated clears within the same millisecond get a numeric
    /// suffix.
    async fn next_entry_path(&self) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%d_%H%M%S_%3f");
        let mut path = self.history_dir.join(format!("memory_{}.json", stamp));
        let mut n = 1u32;
        while fs::try_exists(&path).await.unwrap_or(false) {
            path = self.history_dir.join(format!("memory_{}_{}.json", stamp, n));
            n += 1;
        }
        path
    }
}

fn into_archive(e: MemoryError) -> MemoryError {
    match e {
        MemoryError::Write(io) => MemoryError::Archive(io),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_document() -> MemoryDocument {
        let mut doc = MemoryDocument::empty();
        doc.project_context = "migrating storage layer".to_string();
        doc.technical_debt.push(serde_json::json!({
            "description": "no retries on flaky writes",
            "priority": "low",
        }));
        doc
    }

    #[tokio::test]
    async fn test_archive_preserves_document_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let archive = ArchiveManager::new(temp_dir.path().join("history")).await.unwrap();

        let doc = sample_document();
        let path = archive.archive(&doc).await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        let restored: MemoryDocument = serde_json::from_str(&content).unwrap();
        assert_eq!(restored, doc);
    }

    #[tokio::test]
    async fn test_archive_entries_never_collide() {
        let temp_dir = TempDir::new().unwrap();
        let archive = ArchiveManager::new(temp_dir.path().join("history")).await.unwrap();

        let doc = sample_document();
        let mut paths = Vec::new();
        for _ in 0..5 {
            paths.push(archive.archive(&doc).await.unwrap());
        }

        let mut unique = paths.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);

        assert_eq!(archive.list().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let archive = ArchiveManager::new(temp_dir.path().join("history")).await.unwrap();

        for _ in 0..3 {
            archive.archive(&MemoryDocument::empty()).await.unwrap();
        }

        let listed = archive.list().await.unwrap();
        let mut sorted = listed.clone();
        sorted.sort();
        assert_eq!(listed, sorted);
    }

    #[tokio::test]
    async fn test_list_ignores_non_json_files() {
        let temp_dir = TempDir::new().unwrap();
        let archive = ArchiveManager::new(temp_dir.path().join("history")).await.unwrap();

        fs::write(archive.dir().join("notes.txt"), "scratch").await.unwrap();
        archive.archive(&MemoryDocument::empty()).await.unwrap();

        assert_eq!(archive.list().await.unwrap().len(), 1);
    }
}
