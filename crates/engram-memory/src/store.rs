//! Durable read/write of the memory document.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::document::{MemoryDocument, MemoryStats};
use crate::error::MemoryError;

/// Result of reading the on-disk document.
///
/// Absence and corruption are distinct states: absence is normal
/// first-run behavior, corruption is a fault the caller reports.
#[derive(Debug)]
pub enum LoadOutcome {
    /// No memory file exists yet.
    Absent,
    /// The document parsed cleanly.
    Parsed(MemoryDocument),
    /// The file exists but does not parse.
    Corrupt(MemoryError),
}

/// File-backed store for the single memory document.
///
/// Stateless between calls: every operation re-reads the disk, so
/// separate short-lived processes never diverge from on-disk state.
pub struct MemoryStore {
    memory_path: PathBuf,
}

impl MemoryStore {
    /// Create a store for the given document path, ensuring the
    /// parent directory exists.
    pub async fn new(memory_path: impl Into<PathBuf>) -> Result<Self, MemoryError> {
        let memory_path = memory_path.into();

        if let Some(parent) = memory_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(MemoryError::Write)?;
            }
        }

        debug!("MemoryStore initialized at {:?}", memory_path);

        Ok(Self { memory_path })
    }

    /// Path of the on-disk document.
    pub fn path(&self) -> &Path {
        &self.memory_path
    }

    /// Read the current document.
    pub async fn read(&self) -> Result<LoadOutcome, MemoryError> {
        let content = match fs::read_to_string(&self.memory_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoadOutcome::Absent);
            }
            Err(e) => return Err(MemoryError::Read(e)),
        };

        match serde_json::from_str::<MemoryDocument>(&content) {
            Ok(doc) => Ok(LoadOutcome::Parsed(doc)),
            Err(e) => Ok(LoadOutcome::Corrupt(MemoryError::Parse(e))),
        }
    }

    /// Read the current document, substituting the empty document for
    /// absent, corrupt, or unreadable state. The fault, if any, is
    /// returned alongside so the caller can surface it as a warning.
    pub async fn read_or_empty(&self) -> (MemoryDocument, Option<MemoryError>) {
        match self.read().await {
            Ok(LoadOutcome::Absent) => (MemoryDocument::empty(), None),
            Ok(LoadOutcome::Parsed(doc)) => (doc, None),
            Ok(LoadOutcome::Corrupt(e)) => (MemoryDocument::empty(), Some(e)),
            Err(e) => (MemoryDocument::empty(), Some(e)),
        }
    }

    /// Stamp and durably write a document.
    ///
    /// `last_updated` is set to the moment of write. The write goes to
    /// a temp file in the same directory, is fsynced, then renamed
    /// over the target, so a concurrent reader observes either the old
    /// or the new complete document, never a torn one.
    pub async fn save(&self, mut doc: MemoryDocument) -> Result<MemoryDocument, MemoryError> {
        doc.last_updated = Some(Utc::now());

        let content = serde_json::to_string_pretty(&doc).map_err(|e| {
            MemoryError::Serialization(format!("Failed to serialize memory document: {}", e))
        })?;

        write_atomic(&self.memory_path, &content).await?;

        debug!("Saved memory document to {:?}", self.memory_path);
        Ok(doc)
    }

    /// Summary of the stored document. Never mutates state.
    ///
    /// A corrupt or unreadable file degrades to empty-document counts;
    /// the fault is returned alongside as a warning.
    pub async fn stats(&self) -> (MemoryStats, Option<MemoryError>) {
        let size_bytes = match fs::metadata(&self.memory_path).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return (MemoryStats::absent(), None);
            }
            Err(e) => return (MemoryStats::absent(), Some(MemoryError::Read(e))),
        };

        let (doc, warning) = self.read_or_empty().await;

        let stats = MemoryStats {
            exists: true,
            size_bytes,
            last_updated: doc.last_updated,
            active_tasks: doc.active_tasks.len(),
            technical_debt: doc.technical_debt.len(),
            files_tracked: doc.file_map.len(),
        };
        (stats, warning)
    }
}

/// Write `content` to `path` without ever exposing a partial file:
/// temp file in the same directory, fsync, atomic rename.
pub(crate) async fn write_atomic(path: &Path, content: &str) -> Result<(), MemoryError> {
    let tmp_path = match path.file_name() {
        Some(name) => path.with_file_name(format!(".{}.tmp", name.to_string_lossy())),
        None => path.with_extension("tmp"),
    };

    let result: std::io::Result<()> = async {
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp_path, path).await
    }
    .await;

    if let Err(e) = result {
        // Best-effort cleanup; the fault to report is the write itself.
        let _ = fs::remove_file(&tmp_path).await;
        return Err(MemoryError::Write(e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store_in(dir: &TempDir) -> MemoryStore {
        MemoryStore::new(dir.path().join(".engram.json")).await.unwrap()
    }

    #[tokio::test]
    async fn test_read_absent_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir).await;

        assert!(matches!(store.read().await.unwrap(), LoadOutcome::Absent));

        let (doc, warning) = store.read_or_empty().await;
        assert_eq!(doc, MemoryDocument::empty());
        assert!(warning.is_none());
    }

    #[tokio::test]
    async fn test_save_and_read_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir).await;

        let mut doc = MemoryDocument::empty();
        doc.project_context = "refactor auth".to_string();
        doc.active_tasks.push(serde_json::json!("fix bug"));
        doc.file_map.insert(
            "src/auth.rs".to_string(),
            serde_json::json!({"summary": "token handling"}),
        );

        let saved = store.save(doc.clone()).await.unwrap();
        assert!(saved.last_updated.is_some());

        match store.read().await.unwrap() {
            LoadOutcome::Parsed(loaded) => {
                assert_eq!(loaded.project_context, doc.project_context);
                assert_eq!(loaded.active_tasks, doc.active_tasks);
                assert_eq!(loaded.file_map, doc.file_map);
                assert_eq!(loaded.last_updated, saved.last_updated);
            }
            other => panic!("expected parsed document, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_save_refreshes_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir).await;

        let first = store.save(MemoryDocument::empty()).await.unwrap();
        let second = store.save(first.clone()).await.unwrap();
        assert!(second.last_updated.unwrap() >= first.last_updated.unwrap());
    }

    #[tokio::test]
    async fn test_read_corrupt_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir).await;

        fs::write(store.path(), "{not json").await.unwrap();

        match store.read().await.unwrap() {
            LoadOutcome::Corrupt(MemoryError::Parse(_)) => {}
            other => panic!("expected corrupt outcome, got {:?}", other),
        }

        let (doc, warning) = store.read_or_empty().await;
        assert_eq!(doc, MemoryDocument::empty());
        assert!(matches!(warning, Some(MemoryError::Parse(_))));
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir).await;

        store.save(MemoryDocument::empty()).await.unwrap();

        let mut entries = fs::read_dir(temp_dir.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec![".engram.json".to_string()]);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir).await;

        let mut big = MemoryDocument::empty();
        big.project_context = "x".repeat(4096);
        store.save(big).await.unwrap();

        let mut small = MemoryDocument::empty();
        small.project_context = "tiny".to_string();
        store.save(small).await.unwrap();

        // A torn write over the larger file would leave trailing bytes
        // that break parsing.
        match store.read().await.unwrap() {
            LoadOutcome::Parsed(doc) => assert_eq!(doc.project_context, "tiny"),
            other => panic!("expected parsed document, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir).await;

        let (stats, warning) = store.stats().await;
        assert!(!stats.exists);
        assert_eq!(stats.size_bytes, 0);
        assert!(warning.is_none());

        let mut doc = MemoryDocument::empty();
        doc.active_tasks.push(serde_json::json!("a"));
        doc.active_tasks.push(serde_json::json!("b"));
        doc.technical_debt.push(serde_json::json!("debt"));
        doc.file_map.insert("a.rs".to_string(), serde_json::json!({}));
        store.save(doc).await.unwrap();

        let (stats, warning) = store.stats().await;
        assert!(stats.exists);
        assert!(stats.size_bytes > 0);
        assert!(stats.last_updated.is_some());
        assert_eq!(stats.active_tasks, 2);
        assert_eq!(stats.technical_debt, 1);
        assert_eq!(stats.files_tracked, 1);
        assert!(warning.is_none());
    }
}
