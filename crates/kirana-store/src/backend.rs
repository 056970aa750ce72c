//! # Storage Backends
//!
//! The persistence contract is a plain string key-value store, the shape
//! of the browser storage the UI shell runs against. Two implementations
//! ship here: an in-memory map for tests and a single-file JSON map for
//! running outside a browser.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Backend Trait
// =============================================================================

/// A string key-value store holding JSON-encoded components.
///
/// Implementations only move strings around; what the strings contain is
/// the snapshot module's business.
pub trait StorageBackend {
    /// Reads the value under `key`, or `None` if absent.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes the value under `key`. Removing an absent key is fine.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// Memory Backend
// =============================================================================

/// Backend over a plain in-memory map. Used by tests and as scratch
/// storage for previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// JSON File Backend
// =============================================================================

/// Backend that keeps the whole key-value map in one JSON file.
///
/// Every write rewrites the file; the data set here is a few hundred
/// kilobytes at the very worst, and one file keeps backup copies trivial.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileBackend {
    /// Opens (or creates) the backing file.
    ///
    /// ## Errors
    /// - `Io` if the file exists but cannot be read
    /// - `InvalidFormat` if it exists but is not a JSON string map
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str::<BTreeMap<String, String>>(&raw).map_err(|e| {
                StoreError::InvalidFormat {
                    reason: format!("backing file is not a string map: {e}"),
                }
            })?
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = entries.len(), "opened storage file");
        Ok(JsonFileBackend { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> StoreResult<()> {
        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl StorageBackend for JsonFileBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
