use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seekr_adapters::providers::register_builtins;
use seekr_adapters::AdapterRegistry;
use seekr_agent::QueryAgent;
use seekr_api::config::ServerConfig;
use seekr_api::router::build_app_router;
use seekr_api::state::AppState;
use seekr_core::vault::SecretVault;
use seekr_resolver::ServiceResolver;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seekr_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = seekr_db::create_pool(&database_url, config.database_max_connections)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    seekr_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    seekr_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    match seekr_db::repositories::SessionRepo::prune_expired(&pool).await {
        Ok(pruned) => tracing::info!(pruned, "Expired login sessions pruned"),
        Err(err) => tracing::warn!(error = %err, "Failed to prune expired sessions"),
    }

    // --- Vault ---
    let vault = Arc::new(
        SecretVault::from_key_material(&config.api_key_encryption_key)
            .expect("API_KEY_ENCRYPTION_KEY must be 32 bytes of hex or base64"),
    );

    // --- Adapter registry (frozen after builtin registration) ---
    let mut registry = AdapterRegistry::new();
    register_builtins(&mut registry);
    let registry = Arc::new(registry);
    tracing::info!("Adapter registry initialized");

    // --- Resolver and agent ---
    let resolver = Arc::new(ServiceResolver::new(
        pool.clone(),
        Arc::clone(&vault),
        Arc::clone(&registry),
        config.defaults.clone(),
    ));
    let agent = Arc::new(QueryAgent::new(Arc::clone(&resolver)));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        vault,
        registry,
        resolver,
        agent,
        http: reqwest::Client::new(),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
