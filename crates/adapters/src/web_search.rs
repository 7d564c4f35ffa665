//! Web search capability contract.

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::types::SearchResult;

/// A web search provider.
///
/// Results come back in the provider's own relevance order -- this layer does
/// not re-sort. An empty result list is valid, not an error.
#[async_trait]
pub trait WebSearchAdapter: Send + Sync {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, AdapterError>;
}

impl std::fmt::Debug for dyn WebSearchAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn WebSearchAdapter")
    }
}
