//! Web scraper capability contract.

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::types::Document;

/// A web page scraper.
///
/// Batch loads are best-effort: a failure on one URL is logged and the URL is
/// omitted from the results; it never aborts the batch.
#[async_trait]
pub trait WebScraperAdapter: Send + Sync {
    async fn load(&self, urls: &[String]) -> Result<Vec<Document>, AdapterError>;
}

impl std::fmt::Debug for dyn WebScraperAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn WebScraperAdapter")
    }
}
