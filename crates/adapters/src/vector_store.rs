//! Vector store capability contract.

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::types::Document;

/// A similarity-search document store.
#[async_trait]
pub trait VectorStoreAdapter: Send + Sync {
    /// Add documents, returning their assigned ids in input order.
    async fn add_documents(&self, documents: &[Document]) -> Result<Vec<String>, AdapterError>;

    /// Return up to `k` documents ranked by descending relevance.
    ///
    /// `k` must be >= 1. Fewer than `k` results is valid when the store holds
    /// fewer matches.
    async fn similarity_search(&self, query: &str, k: usize)
        -> Result<Vec<Document>, AdapterError>;

    /// Delete documents by id. Returns `true` on success.
    async fn delete(&self, ids: &[String]) -> Result<bool, AdapterError>;
}

impl std::fmt::Debug for dyn VectorStoreAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn VectorStoreAdapter")
    }
}
