use std::sync::Arc;

use seekr_adapters::AdapterRegistry;
use seekr_agent::QueryAgent;
use seekr_core::vault::SecretVault;
use seekr_resolver::ServiceResolver;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Constructed once in `main.rs` (or the test harness) and cheaply cloneable;
/// everything non-trivial sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sqlx::PgPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Vault for encrypting and masking stored API keys.
    pub vault: Arc<SecretVault>,
    /// Frozen adapter registry with the built-in providers.
    pub registry: Arc<AdapterRegistry>,
    /// Credential resolution facade.
    pub resolver: Arc<ServiceResolver>,
    /// Search-and-answer agent.
    pub agent: Arc<QueryAgent>,
    /// Outbound HTTP client (Google OAuth).
    pub http: reqwest::Client,
}
