//! The operation facade: load, save, clear, stats, add-task.

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::archive::ArchiveManager;
use crate::config::MemoryConfig;
use crate::document::MemoryDocument;
use crate::error::MemoryError;
use crate::render::render_document;
use crate::store::{LoadOutcome, MemoryStore};

/// Facade over the document store and the archive.
///
/// Every operation is stateless: nothing is cached between calls, so
/// separate short-lived processes always agree with the disk. No
/// operation retries internally; a failed I/O step is reported once
/// and the caller decides whether to retry.
pub struct MemoryManager {
    store: MemoryStore,
    archive: ArchiveManager,
}

impl MemoryManager {
    /// Create a manager rooted at the configured working directory,
    /// ensuring the memory and history locations exist.
    pub async fn new(config: &MemoryConfig) -> Result<Self, MemoryError> {
        let store = MemoryStore::new(config.memory_path()).await?;
        let archive = ArchiveManager::new(config.history_path()).await?;
        Ok(Self { store, archive })
    }

    /// Render the current memory for context injection.
    ///
    /// Absent memory yields an empty string. A corrupt or unreadable
    /// file is reported as a bracketed warning string, never an error:
    /// a memory fault must not block a session.
    pub async fn load(&self) -> Result<String, MemoryError> {
        match self.store.read().await {
            Ok(LoadOutcome::Absent) => {
                info!("No memory file found, starting fresh");
                Ok(String::new())
            }
            Ok(LoadOutcome::Parsed(doc)) => Ok(render_document(&doc)),
            Ok(LoadOutcome::Corrupt(e)) => {
                warn!("Memory file corrupted: {}", e);
                Ok(format!("[WARNING: Memory file corrupted - {}]", e))
            }
            Err(e) => {
                warn!("Failed to load memory: {}", e);
                Ok(format!("[ERROR: Failed to load memory - {}]", e))
            }
        }
    }

    /// Persist a payload, or refresh the timestamp of the current
    /// document when no payload is given.
    ///
    /// The payload is the literal JSON text of a full document;
    /// unknown fields are dropped and missing fields defaulted.
    pub async fn save(&self, payload: Option<&str>) -> Result<String, MemoryError> {
        let doc = match payload {
            Some(text) => serde_json::from_str::<MemoryDocument>(text).map_err(MemoryError::Parse)?,
            None => {
                let (doc, warning) = self.store.read_or_empty().await;
                if let Some(e) = warning {
                    warn!("Existing memory unreadable, saving fresh state: {}", e);
                }
                doc
            }
        };

        self.store.save(doc).await?;
        info!("Memory saved to {:?}", self.store.path());
        Ok(format!("Memory saved: {}", self.store.path().display()))
    }

    /// Archive the current document, then reset the store to the
    /// empty state.
    ///
    /// The reset only happens after the archive entry is durably
    /// written; an archive failure aborts the whole operation so
    /// unarchived data is never discarded. A corrupt live document
    /// also aborts (raw bytes cannot be archived as a document) and is
    /// left in place for manual recovery.
    pub async fn clear(&self) -> Result<String, MemoryError> {
        match self.store.read().await? {
            LoadOutcome::Absent => {
                self.store.save(MemoryDocument::empty()).await?;
                info!("Memory cleared, no prior document to archive");
                Ok("Memory cleared and reset".to_string())
            }
            LoadOutcome::Parsed(doc) => {
                let archived = self.archive.archive(&doc).await?;
                self.store.save(MemoryDocument::empty()).await?;
                info!("Memory archived to {:?} and reset", archived);
                Ok(format!("Memory archived: {}", archived.display()))
            }
            LoadOutcome::Corrupt(e) => Err(e),
        }
    }

    /// Stats blob for the stored document, as pretty JSON.
    pub async fn stats(&self) -> Result<String, MemoryError> {
        let (stats, warning) = self.store.stats().await;
        if let Some(e) = warning {
            warn!("Memory file unreadable, reporting empty counts: {}", e);
        }
        serde_json::to_string_pretty(&stats)
            .map_err(|e| MemoryError::Serialization(format!("Failed to serialize stats: {}", e)))
    }

    /// Append a task to the active task list and save.
    pub async fn add_task(&self, description: &str, priority: &str) -> Result<String, MemoryError> {
        let (mut doc, warning) = self.store.read_or_empty().await;
        if let Some(e) = warning {
            warn!("Existing memory unreadable, starting from empty state: {}", e);
        }

        doc.active_tasks.push(json!({
            "description": description,
            "added_at": Utc::now().to_rfc3339(),
            "priority": priority,
        }));

        self.store.save(doc).await?;
        Ok(format!("Task added: {}", description))
    }

    /// The underlying document store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// The archive of cleared documents.
    pub fn archive_manager(&self) -> &ArchiveManager {
        &self.archive
    }
}
