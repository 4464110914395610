//! Preference backend trait.

use async_trait::async_trait;

use super::PreferenceError;

/// Backend trait for preference storage.
///
/// Implementations handle raw byte storage/retrieval.
/// The `PreferenceStore` wraps this with JSON serialization and the
/// fail-open policy.
#[async_trait]
pub trait PreferenceBackend: Send + Sync {
    /// Get raw bytes for a key.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, PreferenceError>;

    /// Set raw bytes for a key.
    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), PreferenceError>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), PreferenceError>;

    /// Get all keys matching a prefix.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PreferenceError>;
}
