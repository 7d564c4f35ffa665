//! Provider registry: name -> factory, one independent namespace per
//! capability kind.
//!
//! The registry is populated during process initialization and then frozen
//! behind an `Arc`, so concurrent request handling reads it without locking.
//! It holds factories only; every resolve call constructs a fresh adapter.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AdapterConfig;
use crate::embeddings::EmbeddingsAdapter;
use crate::error::{AdapterError, RegistryError};
use crate::llm::LlmAdapter;
use crate::storage::StorageAdapter;
use crate::vector_store::VectorStoreAdapter;
use crate::web_scraper::WebScraperAdapter;
use crate::web_search::WebSearchAdapter;

/// The capability a provider name is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    Llm,
    Embeddings,
    VectorStore,
    WebSearch,
    WebScraper,
    Storage,
}

impl std::fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AdapterKind::Llm => "llm",
            AdapterKind::Embeddings => "embeddings",
            AdapterKind::VectorStore => "vector store",
            AdapterKind::WebSearch => "web search",
            AdapterKind::WebScraper => "web scraper",
            AdapterKind::Storage => "storage",
        };
        f.write_str(name)
    }
}

type Factory<T> = Arc<dyn Fn(AdapterConfig) -> Result<Arc<T>, AdapterError> + Send + Sync>;

/// Vector store factories additionally receive the embeddings adapter used to
/// turn text into vectors.
type VectorStoreFactory = Arc<
    dyn Fn(AdapterConfig, Arc<dyn EmbeddingsAdapter>) -> Result<Arc<dyn VectorStoreAdapter>, AdapterError>
        + Send
        + Sync,
>;

/// Registry of adapter factories, one map per capability kind.
#[derive(Default)]
pub struct AdapterRegistry {
    llm: HashMap<String, Factory<dyn LlmAdapter>>,
    embeddings: HashMap<String, Factory<dyn EmbeddingsAdapter>>,
    vector_store: HashMap<String, VectorStoreFactory>,
    web_search: HashMap<String, Factory<dyn WebSearchAdapter>>,
    web_scraper: HashMap<String, Factory<dyn WebScraperAdapter>>,
    storage: HashMap<String, Factory<dyn StorageAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Registration (case-insensitive, silent overwrite) ------------------
    //
    // Re-registering the same (kind, name) overwrites without error so that
    // initialization code may run more than once.

    pub fn register_llm<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(AdapterConfig) -> Result<Arc<dyn LlmAdapter>, AdapterError> + Send + Sync + 'static,
    {
        self.llm.insert(name.to_lowercase(), Arc::new(factory));
    }

    pub fn register_embeddings<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(AdapterConfig) -> Result<Arc<dyn EmbeddingsAdapter>, AdapterError>
            + Send
            + Sync
            + 'static,
    {
        self.embeddings.insert(name.to_lowercase(), Arc::new(factory));
    }

    pub fn register_vector_store<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(AdapterConfig, Arc<dyn EmbeddingsAdapter>) -> Result<Arc<dyn VectorStoreAdapter>, AdapterError>
            + Send
            + Sync
            + 'static,
    {
        self.vector_store.insert(name.to_lowercase(), Arc::new(factory));
    }

    pub fn register_web_search<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(AdapterConfig) -> Result<Arc<dyn WebSearchAdapter>, AdapterError>
            + Send
            + Sync
            + 'static,
    {
        self.web_search.insert(name.to_lowercase(), Arc::new(factory));
    }

    pub fn register_web_scraper<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(AdapterConfig) -> Result<Arc<dyn WebScraperAdapter>, AdapterError>
            + Send
            + Sync
            + 'static,
    {
        self.web_scraper.insert(name.to_lowercase(), Arc::new(factory));
    }

    pub fn register_storage<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(AdapterConfig) -> Result<Arc<dyn StorageAdapter>, AdapterError>
            + Send
            + Sync
            + 'static,
    {
        self.storage.insert(name.to_lowercase(), Arc::new(factory));
    }

    // -- Resolution: a fresh adapter per call -------------------------------

    pub fn llm(
        &self,
        name: &str,
        config: AdapterConfig,
    ) -> Result<Arc<dyn LlmAdapter>, RegistryError> {
        let factory = self
            .llm
            .get(&name.to_lowercase())
            .ok_or_else(|| Self::unknown(AdapterKind::Llm, name))?;
        Ok(factory(config)?)
    }

    pub fn embeddings(
        &self,
        name: &str,
        config: AdapterConfig,
    ) -> Result<Arc<dyn EmbeddingsAdapter>, RegistryError> {
        let factory = self
            .embeddings
            .get(&name.to_lowercase())
            .ok_or_else(|| Self::unknown(AdapterKind::Embeddings, name))?;
        Ok(factory(config)?)
    }

    pub fn vector_store(
        &self,
        name: &str,
        config: AdapterConfig,
        embeddings: Arc<dyn EmbeddingsAdapter>,
    ) -> Result<Arc<dyn VectorStoreAdapter>, RegistryError> {
        let factory = self
            .vector_store
            .get(&name.to_lowercase())
            .ok_or_else(|| Self::unknown(AdapterKind::VectorStore, name))?;
        Ok(factory(config, embeddings)?)
    }

    pub fn web_search(
        &self,
        name: &str,
        config: AdapterConfig,
    ) -> Result<Arc<dyn WebSearchAdapter>, RegistryError> {
        let factory = self
            .web_search
            .get(&name.to_lowercase())
            .ok_or_else(|| Self::unknown(AdapterKind::WebSearch, name))?;
        Ok(factory(config)?)
    }

    pub fn web_scraper(
        &self,
        name: &str,
        config: AdapterConfig,
    ) -> Result<Arc<dyn WebScraperAdapter>, RegistryError> {
        let factory = self
            .web_scraper
            .get(&name.to_lowercase())
            .ok_or_else(|| Self::unknown(AdapterKind::WebScraper, name))?;
        Ok(factory(config)?)
    }

    pub fn storage(
        &self,
        name: &str,
        config: AdapterConfig,
    ) -> Result<Arc<dyn StorageAdapter>, RegistryError> {
        let factory = self
            .storage
            .get(&name.to_lowercase())
            .ok_or_else(|| Self::unknown(AdapterKind::Storage, name))?;
        Ok(factory(config)?)
    }

    fn unknown(kind: AdapterKind, name: &str) -> RegistryError {
        RegistryError::UnknownProvider {
            kind,
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use crate::llm::MessageStream;
    use crate::types::ChatMessage;

    /// Stub LLM that echoes the model name it was constructed with.
    struct StubLlm {
        model: String,
    }

    #[async_trait]
    impl LlmAdapter for StubLlm {
        async fn generate(&self, _messages: &[ChatMessage]) -> Result<ChatMessage, AdapterError> {
            Ok(ChatMessage::assistant(self.model.clone()))
        }

        async fn stream(&self, _messages: &[ChatMessage]) -> Result<MessageStream, AdapterError> {
            Ok(Box::pin(futures::stream::empty()))
        }
    }

    fn stub_factory(config: AdapterConfig) -> Result<Arc<dyn LlmAdapter>, AdapterError> {
        Ok(Arc::new(StubLlm {
            model: config.model.unwrap_or_else(|| "default".into()),
        }))
    }

    #[tokio::test]
    async fn resolve_constructs_through_the_factory_with_config() {
        let mut registry = AdapterRegistry::new();
        registry.register_llm("cohere", stub_factory);

        let adapter = registry
            .llm("cohere", AdapterConfig::new().with_model("command-x"))
            .expect("registered provider should resolve");
        let reply = adapter.generate(&[]).await.unwrap();
        assert_eq!(reply.content, "command-x");
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let registry = AdapterRegistry::new();
        let err = registry.llm("nonexistent", AdapterConfig::new()).unwrap_err();
        assert_matches!(
            err,
            RegistryError::UnknownProvider {
                kind: AdapterKind::Llm,
                ..
            }
        );
    }

    #[test]
    fn names_are_case_insensitive() {
        let mut registry = AdapterRegistry::new();
        registry.register_llm("CoHeRe", stub_factory);
        assert!(registry.llm("cohere", AdapterConfig::new()).is_ok());
        assert!(registry.llm("COHERE", AdapterConfig::new()).is_ok());
    }

    #[tokio::test]
    async fn reregistering_overwrites_silently() {
        let mut registry = AdapterRegistry::new();
        registry.register_llm("p", |_| {
            Ok(Arc::new(StubLlm {
                model: "first".into(),
            }) as Arc<dyn LlmAdapter>)
        });
        registry.register_llm("p", |_| {
            Ok(Arc::new(StubLlm {
                model: "second".into(),
            }) as Arc<dyn LlmAdapter>)
        });

        let adapter = registry.llm("p", AdapterConfig::new()).unwrap();
        assert_eq!(adapter.generate(&[]).await.unwrap().content, "second");
    }

    #[test]
    fn kinds_are_independent_namespaces() {
        let mut registry = AdapterRegistry::new();
        registry.register_llm("acme", stub_factory);

        // The same name means nothing for other kinds.
        assert_matches!(
            registry.web_search("acme", AdapterConfig::new()),
            Err(RegistryError::UnknownProvider {
                kind: AdapterKind::WebSearch,
                ..
            })
        );
    }

    #[tokio::test]
    async fn each_resolve_returns_a_fresh_instance() {
        let mut registry = AdapterRegistry::new();
        registry.register_llm("p", stub_factory);

        let a = registry.llm("p", AdapterConfig::new().with_model("a")).unwrap();
        let b = registry.llm("p", AdapterConfig::new().with_model("b")).unwrap();
        assert_eq!(a.generate(&[]).await.unwrap().content, "a");
        assert_eq!(b.generate(&[]).await.unwrap().content, "b");
    }
}
