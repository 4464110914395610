//! Persisted preferences as typed key-value storage.
//!
//! The [`PreferenceStore`] is shared by every grid and form in the process.
//! Reads and writes are fail-open: a missing, unreadable or corrupt entry
//! behaves exactly like an absent one, and a failed write is logged and
//! forgotten. Callers that need to observe failures (maintenance tooling)
//! use the `try_*` variants instead.

mod backend;
mod memory;
mod sqlite;

pub use backend::PreferenceBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Preference storage error type.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("storage quota of {limit} bytes exceeded writing `{key}`")]
    QuotaExceeded { key: String, limit: usize },
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),
    #[error("deserialization error: {0}")]
    Deserialization(serde_json::Error),
}

/// Key under which a grid's page size is stored.
pub fn grid_page_size_key(grid_id: &str) -> String {
    format!("grid_pageSize_{grid_id}")
}

/// Key under which a grid's column widths are stored.
pub fn grid_widths_key(grid_id: &str) -> String {
    format!("gridWidths_{grid_id}")
}

/// Key under which a grid's column visibility is stored.
pub fn grid_visibility_key(grid_id: &str) -> String {
    format!("gridVisibility_{grid_id}")
}

/// Every key a grid may persist, in a stable order.
pub fn grid_keys(grid_id: &str) -> [String; 3] {
    [
        grid_page_size_key(grid_id),
        grid_widths_key(grid_id),
        grid_visibility_key(grid_id),
    ]
}

/// Typed preference store.
///
/// Wraps a `PreferenceBackend` with JSON serialization. Cheap to clone; all
/// clones share the same backend.
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn PreferenceBackend>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore").finish_non_exhaustive()
    }
}

impl PreferenceStore {
    /// Create a new store with the given backend.
    pub fn new(backend: impl PreferenceBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create a store over an already shared backend.
    pub fn with_backend(backend: Arc<dyn PreferenceBackend>) -> Self {
        Self { backend }
    }

    /// Create a store over a fresh [`MemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    // -------------------------------------------------------------------------
    // Fallible access
    // -------------------------------------------------------------------------

    /// Get a typed value for a key.
    pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PreferenceError> {
        match self.backend.get_bytes(key).await? {
            Some(bytes) => Ok(Some(
                serde_json::from_slice(&bytes).map_err(PreferenceError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    /// Set a typed value for a key.
    pub async fn try_set<T: Serialize + ?Sized + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), PreferenceError> {
        let bytes = serde_json::to_vec(value).map_err(PreferenceError::Serialization)?;
        self.backend.set_bytes(key, bytes).await
    }

    /// Delete a key.
    pub async fn try_remove(&self, key: &str) -> Result<(), PreferenceError> {
        self.backend.delete(key).await
    }

    /// Get all keys matching a prefix.
    pub async fn try_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PreferenceError> {
        self.backend.keys_with_prefix(prefix).await
    }

    // -------------------------------------------------------------------------
    // Fail-open access
    // -------------------------------------------------------------------------

    /// Get a typed value, treating storage errors and corrupt content as absent.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(PreferenceError::Deserialization(e)) => {
                log::debug!("ignoring malformed preference `{key}`: {e}");
                None
            }
            Err(e) => {
                log::warn!("failed to read preference `{key}`: {e}");
                None
            }
        }
    }

    /// Get a typed value, returning `default` when absent or unreadable.
    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).await.unwrap_or(default)
    }

    /// Store a typed value. Failures are logged and otherwise ignored.
    pub async fn set<T: Serialize + ?Sized + Sync>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_set(key, value).await {
            log::warn!("failed to save preference `{key}`: {e}");
        }
    }

    /// Delete a key. Failures are logged and otherwise ignored.
    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.try_remove(key).await {
            log::warn!("failed to remove preference `{key}`: {e}");
        }
    }

    /// Get all keys matching a prefix, or none if the backend fails.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.try_keys_with_prefix(prefix).await.unwrap_or_else(|e| {
            log::warn!("failed to list preferences under `{prefix}`: {e}");
            Vec::new()
        })
    }

    /// Remove every key under `prefix`, returning how many were removed.
    pub async fn purge_prefix(&self, prefix: &str) -> Result<usize, PreferenceError> {
        let keys = self.try_keys_with_prefix(prefix).await?;
        for key in &keys {
            self.try_remove(key).await?;
        }
        Ok(keys.len())
    }
}
