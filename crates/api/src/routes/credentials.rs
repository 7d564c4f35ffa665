//! Route definitions for the `/credentials` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::credentials;
use crate::state::AppState;

/// Routes mounted at `/credentials`.
///
/// ```text
/// GET    /      -> list_credentials
/// POST   /      -> bulk_save_credentials (upsert)
/// PUT    /      -> bulk_update_credentials
/// DELETE /      -> bulk_delete_credentials
/// GET    /{id}  -> get_credential
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(credentials::list_credentials)
                .post(credentials::bulk_save_credentials)
                .put(credentials::bulk_update_credentials)
                .delete(credentials::bulk_delete_credentials),
        )
        .route("/{id}", get(credentials::get_credential))
}
