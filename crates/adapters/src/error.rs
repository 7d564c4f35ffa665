use crate::registry::AdapterKind;

/// Failures raised by adapter implementations.
///
/// Each capability fails with its own variant so callers can distinguish a
/// generation failure from, say, an embedding failure when several adapters
/// participate in one request.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("generation failed: {0}")]
    Generation(String),

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("vector store operation failed: {0}")]
    VectorStore(String),

    #[error("web search failed: {0}")]
    Search(String),

    #[error("scrape failed: {0}")]
    Scrape(String),

    #[error("storage operation failed: {0}")]
    Storage(String),

    #[error("invalid adapter input: {0}")]
    InvalidInput(String),

    /// The provider returned a non-2xx status code.
    #[error("provider API error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failures raised by the provider registry itself.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No factory is registered under `(kind, name)`. This is a server
    /// configuration gap, distinct from a user lacking credentials.
    #[error("unknown {kind} provider: '{name}'")]
    UnknownProvider { kind: AdapterKind, name: String },

    /// The factory ran but could not construct the adapter.
    #[error(transparent)]
    Construction(#[from] AdapterError),
}
