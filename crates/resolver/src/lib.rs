//! Service resolution: from a user id to a ready-to-call adapter.
//!
//! For each capability the resolver picks the user's winning credential
//! (defaults first, then oldest), decrypts the key through the vault, merges
//! catalog defaults under credential overrides, and asks the registry to
//! construct a fresh adapter. Nothing is cached: neither adapters nor
//! decrypted secrets outlive the request that needed them.

use std::sync::Arc;

use sqlx::PgPool;

use seekr_adapters::embeddings::EmbeddingsAdapter;
use seekr_adapters::error::RegistryError;
use seekr_adapters::llm::LlmAdapter;
use seekr_adapters::registry::AdapterRegistry;
use seekr_adapters::vector_store::VectorStoreAdapter;
use seekr_adapters::web_scraper::WebScraperAdapter;
use seekr_adapters::web_search::WebSearchAdapter;
use seekr_adapters::AdapterConfig;
use seekr_core::types::{categories, DbId, JsonMap};
use seekr_core::vault::{SecretVault, VaultError};
use seekr_db::models::credential::ResolvedCredential;
use seekr_db::repositories::CredentialRepo;

/// Failures while resolving a user's adapter for a capability.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The user has no usable credential for this category. Client
    /// actionable: add a key or activate a service.
    #[error("no credential configured for category '{category}'")]
    NoCredentialConfigured { category: String },

    /// Registry-level failure: unknown provider or factory refusal. A server
    /// configuration gap, not a user problem.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provider and model knobs for the explicit-api-key path, supplied through
/// server configuration rather than the per-user store.
#[derive(Debug, Clone)]
pub struct SystemDefaults {
    pub llm_provider: String,
    pub llm_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub embedding_provider: String,
    pub embedding_model: String,
}

impl Default for SystemDefaults {
    fn default() -> Self {
        Self {
            llm_provider: "openai".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            embedding_provider: "openai".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
        }
    }
}

/// The resolution facade handed to every consumer of user-scoped adapters.
pub struct ServiceResolver {
    pool: PgPool,
    vault: Arc<SecretVault>,
    registry: Arc<AdapterRegistry>,
    defaults: SystemDefaults,
}

impl ServiceResolver {
    pub fn new(
        pool: PgPool,
        vault: Arc<SecretVault>,
        registry: Arc<AdapterRegistry>,
        defaults: SystemDefaults,
    ) -> Self {
        Self {
            pool,
            vault,
            registry,
            defaults,
        }
    }

    /// Resolve an LLM adapter.
    ///
    /// An explicit `api_key` bypasses the credential store entirely and uses
    /// the system default provider and model (the test/dev path).
    pub async fn resolve_llm(
        &self,
        user_id: DbId,
        api_key: Option<&str>,
    ) -> Result<Arc<dyn LlmAdapter>, ResolveError> {
        if let Some(key) = api_key {
            let config = explicit_llm_config(&self.defaults, key);
            return Ok(self.registry.llm(&self.defaults.llm_provider, config)?);
        }

        let (credential, config) = self.winning_credential(user_id, categories::LLM).await?;
        Ok(self.registry.llm(&credential.provider, config)?)
    }

    pub async fn resolve_embeddings(
        &self,
        user_id: DbId,
        api_key: Option<&str>,
    ) -> Result<Arc<dyn EmbeddingsAdapter>, ResolveError> {
        if let Some(key) = api_key {
            let config = AdapterConfig::new()
                .with_model(self.defaults.embedding_model.clone())
                .with_api_key(key);
            return Ok(self
                .registry
                .embeddings(&self.defaults.embedding_provider, config)?);
        }

        let (credential, config) = self
            .winning_credential(user_id, categories::EMBEDDING)
            .await?;
        Ok(self.registry.embeddings(&credential.provider, config)?)
    }

    /// Resolve a vector store. Requires an embeddings adapter for text to
    /// vector conversion, resolved separately by the caller.
    pub async fn resolve_vector_store(
        &self,
        user_id: DbId,
        embeddings: Arc<dyn EmbeddingsAdapter>,
    ) -> Result<Arc<dyn VectorStoreAdapter>, ResolveError> {
        let (credential, config) = self
            .winning_credential(user_id, categories::VECTOR_STORE)
            .await?;
        Ok(self
            .registry
            .vector_store(&credential.provider, config, embeddings)?)
    }

    /// Resolve a web search adapter, falling back to the keyless DuckDuckGo
    /// provider when the user has no search credential.
    pub async fn resolve_web_search(
        &self,
        user_id: DbId,
    ) -> Result<Arc<dyn WebSearchAdapter>, ResolveError> {
        match self.winning_credential(user_id, categories::SEARCH).await {
            Ok((credential, config)) => {
                Ok(self.registry.web_search(&credential.provider, config)?)
            }
            Err(ResolveError::NoCredentialConfigured { .. }) => {
                tracing::debug!(user_id, "no search credential, using duckduckgo");
                Ok(self
                    .registry
                    .web_search("duckduckgo", AdapterConfig::new())?)
            }
            Err(err) => Err(err),
        }
    }

    /// Resolve a web scraper, falling back to the keyless HTTP scraper when
    /// the user has no scraper credential.
    pub async fn resolve_web_scraper(
        &self,
        user_id: DbId,
    ) -> Result<Arc<dyn WebScraperAdapter>, ResolveError> {
        match self.winning_credential(user_id, categories::SCRAPER).await {
            Ok((credential, config)) => {
                Ok(self.registry.web_scraper(&credential.provider, config)?)
            }
            Err(ResolveError::NoCredentialConfigured { .. }) => {
                tracing::debug!(user_id, "no scraper credential, using plain http");
                Ok(self.registry.web_scraper("http", AdapterConfig::new())?)
            }
            Err(err) => Err(err),
        }
    }

    /// True when the user could resolve the category without a fallback.
    pub async fn has_credential(&self, user_id: DbId, category: &str) -> Result<bool, sqlx::Error> {
        let rows = CredentialRepo::find_for_resolution(&self.pool, user_id, category).await?;
        Ok(!rows.is_empty())
    }

    // ---- private helpers ----

    /// The first resolution row for the category, decrypted and merged into
    /// an [`AdapterConfig`].
    async fn winning_credential(
        &self,
        user_id: DbId,
        category: &str,
    ) -> Result<(ResolvedCredential, AdapterConfig), ResolveError> {
        let rows = CredentialRepo::find_for_resolution(&self.pool, user_id, category).await?;
        let Some(credential) = rows.into_iter().next() else {
            return Err(ResolveError::NoCredentialConfigured {
                category: category.to_string(),
            });
        };

        let plaintext = self.vault.decrypt(&credential.encrypted_api_key)?;
        let merged = merge_config(&credential.default_config, &credential.config);
        let config = AdapterConfig::new().apply_json(&merged).with_api_key(plaintext);

        tracing::debug!(
            user_id,
            category,
            credential_id = credential.credential_id,
            provider = %credential.provider,
            "resolved credential"
        );
        Ok((credential, config))
    }
}

/// Merge catalog defaults under credential overrides. On key collision the
/// credential wins. Non-object inputs contribute nothing.
pub fn merge_config(default: &serde_json::Value, overrides: &serde_json::Value) -> JsonMap {
    let mut merged = default.as_object().cloned().unwrap_or_default();
    if let Some(overrides) = overrides.as_object() {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Configuration for the explicit-api-key LLM path.
fn explicit_llm_config(defaults: &SystemDefaults, api_key: &str) -> AdapterConfig {
    AdapterConfig::new()
        .with_model(defaults.llm_model.clone())
        .with_temperature(defaults.temperature)
        .with_max_tokens(defaults.max_tokens)
        .with_api_key(api_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overrides_win_on_collision() {
        let merged = merge_config(
            &json!({"model": "gpt-4o-mini", "temperature": 0.7}),
            &json!({"temperature": 0.2, "max_tokens": 512}),
        );
        assert_eq!(merged["model"], "gpt-4o-mini");
        assert_eq!(merged["temperature"], 0.2);
        assert_eq!(merged["max_tokens"], 512);
    }

    #[test]
    fn merge_tolerates_non_object_inputs() {
        assert!(merge_config(&json!(null), &json!(null)).is_empty());
        let merged = merge_config(&json!(null), &json!({"a": 1}));
        assert_eq!(merged["a"], 1);
    }

    #[test]
    fn explicit_path_uses_system_defaults() {
        let defaults = SystemDefaults::default();
        let config = explicit_llm_config(&defaults, "sk-explicit");
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.api_key.as_deref(), Some("sk-explicit"));
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_tokens, Some(1024));
    }
}
