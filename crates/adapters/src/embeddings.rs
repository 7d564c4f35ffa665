//! Text embedding capability contract.

use async_trait::async_trait;

use crate::error::AdapterError;

/// A text embedding model.
///
/// Implementations fail the whole call with [`AdapterError::Embedding`] on
/// provider error -- they never return partial or short vectors.
#[async_trait]
pub trait EmbeddingsAdapter: Send + Sync {
    /// Embed a batch of documents, one vector per input in order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AdapterError>;

    /// Embed a single query string.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, AdapterError>;
}

impl std::fmt::Debug for dyn EmbeddingsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn EmbeddingsAdapter")
    }
}
