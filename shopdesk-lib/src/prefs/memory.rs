//! In-memory preference backend using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::{PreferenceBackend, PreferenceError};

/// An in-memory backend backed by a concurrent hash map.
///
/// Data is lost when the process exits. An optional byte quota emulates the
/// storage limits of a browser key-value store: a write that would push the
/// total size of keys and values past the quota fails with
/// [`PreferenceError::QuotaExceeded`].
///
/// # Example
///
/// ```
/// use shopdesk_lib::prefs::MemoryBackend;
///
/// let backend = MemoryBackend::new();
/// assert!(backend.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: DashMap<String, Vec<u8>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    /// Creates a new empty backend without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that rejects writes past `bytes` total.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            store: DashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Total bytes used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.store
            .iter()
            .map(|entry| entry.key().len() + entry.value().len())
            .sum()
    }
}

#[async_trait]
impl PreferenceBackend for MemoryBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, PreferenceError> {
        Ok(self.store.get(key).map(|entry| entry.value().clone()))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), PreferenceError> {
        if let Some(limit) = self.quota {
            // One pass, so a concurrent delete cannot skew the total.
            let others: usize = self
                .store
                .iter()
                .filter(|entry| entry.key() != key)
                .map(|entry| entry.key().len() + entry.value().len())
                .sum();
            let projected = others + key.len() + value.len();
            if projected > limit {
                return Err(PreferenceError::QuotaExceeded {
                    key: key.to_string(),
                    limit,
                });
            }
        }
        self.store.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), PreferenceError> {
        self.store.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PreferenceError> {
        let mut keys: Vec<String> = self
            .store
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}
