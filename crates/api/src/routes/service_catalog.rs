//! Route definitions for the admin `/admin/services` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::service_catalog;
use crate::state::AppState;

/// Routes mounted at `/admin/services` (admin role required).
///
/// ```text
/// GET    /      -> list_services
/// POST   /      -> bulk_create_services
/// PUT    /      -> bulk_update_services
/// DELETE /      -> bulk_delete_services
/// GET    /{id}  -> get_service
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(service_catalog::list_services)
                .post(service_catalog::bulk_create_services)
                .put(service_catalog::bulk_update_services)
                .delete(service_catalog::bulk_delete_services),
        )
        .route("/{id}", get(service_catalog::get_service))
}
