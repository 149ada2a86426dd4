//! Session hand-off storage — carrying `{docType, fields}` across views.
//!
//! DESIGN
//! ======
//! The drafting view serializes its snapshot under a fixed key before
//! navigating to the print view, which rehydrates it on load. Storage is
//! best-effort: writes fall back to a secondary store when the primary is
//! unavailable, and a missing or corrupt snapshot is a recoverable
//! condition (the caller redirects to document selection), never an error.
//! Snapshots written before sessions were typed are a bare field map; those
//! load as the default document type.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::docs;
use crate::fields::FlatFields;

/// Fixed storage key for the hand-off snapshot.
pub const HANDOFF_KEY: &str = "docSession";

// =============================================================================
// TYPES
// =============================================================================

/// The serialized hand-off record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocSession {
    pub doc_type: String,
    pub fields: FlatFields,
}

/// Errors from a snapshot store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value store scoped to the current user session.
pub trait SnapshotStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

// =============================================================================
// BACKENDS
// =============================================================================

/// Process-local store; the default fallback.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("poisoned store lock".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("poisoned store lock".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per entry.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        std::fs::write(self.path_for(key), value).map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

// =============================================================================
// HANDOFF
// =============================================================================

/// Primary store with an optional fallback, mirroring the dual browser
/// stores of the document UI.
pub struct Handoff {
    primary: Box<dyn SnapshotStore>,
    fallback: Option<Box<dyn SnapshotStore>>,
}

impl Handoff {
    #[must_use]
    pub fn new(primary: Box<dyn SnapshotStore>, fallback: Option<Box<dyn SnapshotStore>>) -> Self {
        Self { primary, fallback }
    }

    /// Persist the snapshot, falling back to the secondary store when the
    /// primary is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only when every configured store fails.
    pub fn save(&self, snapshot: &DocSession) -> Result<(), StoreError> {
        let value = serde_json::to_string(snapshot)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match self.primary.write(HANDOFF_KEY, &value) {
            Ok(()) => Ok(()),
            Err(primary_err) => {
                warn!(error = %primary_err, "handoff: primary store write failed");
                match &self.fallback {
                    Some(fallback) => fallback.write(HANDOFF_KEY, &value),
                    None => Err(primary_err),
                }
            }
        }
    }

    /// Load the snapshot, tolerating the legacy bare-field-map shape.
    /// Returns `None` when no store holds a usable record.
    #[must_use]
    pub fn load(&self) -> Option<DocSession> {
        let stores = std::iter::once(&self.primary).chain(self.fallback.as_ref());
        for store in stores {
            match store.read(HANDOFF_KEY) {
                Ok(Some(raw)) => {
                    if let Some(session) = parse_snapshot(&raw) {
                        return Some(session);
                    }
                    warn!("handoff: corrupt snapshot ignored");
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "handoff: store read failed"),
            }
        }
        None
    }
}

fn parse_snapshot(raw: &str) -> Option<DocSession> {
    if let Ok(session) = serde_json::from_str::<DocSession>(raw) {
        return Some(session);
    }
    // Legacy records hold the bare field map of the then-only document type.
    serde_json::from_str::<FlatFields>(raw)
        .ok()
        .map(|fields| DocSession { doc_type: docs::DEFAULT_DOC_TYPE.to_string(), fields })
}
