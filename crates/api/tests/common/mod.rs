//! Shared helpers for API integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use seekr_adapters::providers::register_builtins;
use seekr_adapters::AdapterRegistry;
use seekr_agent::QueryAgent;
use seekr_api::auth::jwt::JwtConfig;
use seekr_api::config::ServerConfig;
use seekr_api::router::build_app_router;
use seekr_api::state::AppState;
use seekr_core::vault::SecretVault;
use seekr_resolver::{ServiceResolver, SystemDefaults};

/// 32 bytes of hex, fixed so ciphertexts survive within a test.
const TEST_VAULT_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_max_connections: 5,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        api_key_encryption_key: TEST_VAULT_KEY.to_string(),
        defaults: SystemDefaults::default(),
        google: None,
    }
}

/// Build the full application router over the given pool, with the same
/// middleware stack as the binary.
pub fn test_app(pool: PgPool) -> Router {
    let config = test_config();

    let vault = Arc::new(
        SecretVault::from_key_material(&config.api_key_encryption_key)
            .unwrap_or_else(|e| panic!("test vault key must parse: {e}")),
    );

    let mut registry = AdapterRegistry::new();
    register_builtins(&mut registry);
    let registry = Arc::new(registry);

    let resolver = Arc::new(ServiceResolver::new(
        pool.clone(),
        Arc::clone(&vault),
        Arc::clone(&registry),
        config.defaults.clone(),
    ));
    let agent = Arc::new(QueryAgent::new(Arc::clone(&resolver)));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        vault,
        registry,
        resolver,
        agent,
        http: reqwest::Client::new(),
    };

    build_app_router(state, &config)
}

/// Build a JSON request, optionally with a Bearer token.
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request through the router and return `(status, parsed JSON body)`.
pub async fn send(app: &Router, request: Request<Body>) -> (u16, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|_| unreachable!("router service is infallible"));
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("non-JSON body: {e}"))
    };
    (status, json)
}

/// Register a user through the API and return `(access_token, refresh_token, user_id)`.
pub async fn register_user(app: &Router, email: &str, username: &str) -> (String, String, i64) {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(serde_json::json!({
                "email": email,
                "username": username,
                "password": "a-strong-password",
            })),
        ),
    )
    .await;
    assert_eq!(status, 201, "registration failed: {body}");

    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_i64().unwrap(),
    )
}
