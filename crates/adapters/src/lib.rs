//! Capability contracts and provider implementations for external AI services.
//!
//! Each capability (LLM, embeddings, vector store, web search, web scraper,
//! storage) is a minimal async trait; concrete providers are reqwest-based
//! glue registered by name in the [`registry::AdapterRegistry`]. The registry
//! holds factories only -- adapters are constructed fresh per resolution so no
//! live network state is shared across unrelated users.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod llm;
pub mod providers;
pub mod registry;
pub mod storage;
pub mod types;
pub mod vector_store;
pub mod web_scraper;
pub mod web_search;

pub use config::AdapterConfig;
pub use embeddings::EmbeddingsAdapter;
pub use error::{AdapterError, RegistryError};
pub use llm::LlmAdapter;
pub use registry::{AdapterKind, AdapterRegistry};
pub use storage::StorageAdapter;
pub use types::{ChatMessage, Document, Role, SearchResult};
pub use vector_store::VectorStoreAdapter;
pub use web_scraper::WebScraperAdapter;
pub use web_search::WebSearchAdapter;
