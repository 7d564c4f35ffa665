pub mod api_keys;
pub mod auth;
pub mod credentials;
pub mod health;
pub mod profile;
pub mod query;
pub mod service_catalog;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                   register (public)
/// /auth/login                      login (public)
/// /auth/refresh                    refresh (public)
/// /auth/logout                     logout (requires auth)
/// /auth/google/login-url           authorization URL (public)
/// /auth/google/callback            code exchange (public)
///
/// /profile                         get, update (auth required)
///
/// /settings                        get, update (auth required)
///
/// /api-keys                        list, create (auth required)
/// /api-keys/{id}                   get, update, delete
///
/// /admin/services                  list, bulk create/update/delete (admin only)
/// /admin/services/{id}             get
///
/// /credentials                     list, bulk save/update/delete (auth required)
/// /credentials/{id}                get
///
/// /query/ask                       agent answer (auth required)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/settings", settings::router())
        .nest("/api-keys", api_keys::router())
        .nest("/admin/services", service_catalog::router())
        .nest("/credentials", credentials::router())
        .nest("/query", query::router())
}
