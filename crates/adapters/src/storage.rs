//! Object storage capability contract.
//!
//! Not part of the AI resolution hot path, but it shares the
//! capability-behind-an-interface shape, so it lives in the same registry.

use async_trait::async_trait;
use seekr_core::types::DbId;

use crate::error::AdapterError;

/// An object store for user uploads (avatars and the like).
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Upload a file into the owner's folder. Returns the storage key.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        owner: DbId,
        folder: &str,
    ) -> Result<String, AdapterError>;

    /// Public URL for a stored key.
    fn get_url(&self, key: &str) -> String;

    /// Delete a stored object. Returns `true` when a delete was performed.
    async fn delete(&self, key: &str) -> Result<bool, AdapterError>;
}

impl std::fmt::Debug for dyn StorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn StorageAdapter")
    }
}
