//! Admin handlers for the `/admin/services` resource.
//!
//! All catalog mutations are bulk: each item in a batch succeeds or fails
//! independently and the response status reflects the split (200 / 207 /
//! 400). Deleting ids that do not exist is reported as data, not an error.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use seekr_core::error::CoreError;
use seekr_core::types::DbId;
use seekr_db::models::service_catalog::{
    CreateServiceCatalogEntry, ServiceCatalogEntry, UpdateServiceCatalogEntry,
};
use seekr_db::repositories::ServiceCatalogRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{bulk_response, DataResponse};
use crate::state::AppState;

/// Request body for `DELETE /admin/services`.
#[derive(Debug, Deserialize)]
pub struct IdList {
    pub ids: Vec<DbId>,
}

/// GET /api/v1/admin/services
pub async fn list_services(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<ServiceCatalogEntry>>>> {
    let entries = ServiceCatalogRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/admin/services/{id}
pub async fn get_service(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(service_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ServiceCatalogEntry>>> {
    let entry = ServiceCatalogRepo::find_by_id(&state.pool, service_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "service",
            id: service_id,
        }))?;

    Ok(Json(DataResponse { data: entry }))
}

/// POST /api/v1/admin/services
///
/// Bulk create. Duplicate slugs fail their item; the rest commit.
pub async fn bulk_create_services(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(items): Json<Vec<CreateServiceCatalogEntry>>,
) -> AppResult<Response> {
    if items.is_empty() {
        return Err(AppError::BadRequest("Batch must not be empty".into()));
    }

    let outcome = ServiceCatalogRepo::bulk_create(&state.pool, &items).await?;
    tracing::info!(
        admin_id = admin.user_id,
        created = outcome.items.len(),
        failed = outcome.errors.len(),
        "service catalog bulk create"
    );
    Ok(bulk_response(outcome))
}

/// PUT /api/v1/admin/services
///
/// Bulk update by id. Missing ids and duplicate slugs fail their item.
pub async fn bulk_update_services(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(items): Json<Vec<UpdateServiceCatalogEntry>>,
) -> AppResult<Response> {
    if items.is_empty() {
        return Err(AppError::BadRequest("Batch must not be empty".into()));
    }

    let outcome = ServiceCatalogRepo::bulk_update(&state.pool, &items).await?;
    tracing::info!(
        admin_id = admin.user_id,
        updated = outcome.items.len(),
        failed = outcome.errors.len(),
        "service catalog bulk update"
    );
    Ok(bulk_response(outcome))
}

/// DELETE /api/v1/admin/services
///
/// Bulk delete by id. User credentials referencing deleted entries go via
/// FK cascade; missing ids are reported in the outcome.
pub async fn bulk_delete_services(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<IdList>,
) -> AppResult<Json<DataResponse<seekr_core::bulk::DeleteOutcome>>> {
    if input.ids.is_empty() {
        return Err(AppError::BadRequest("Batch must not be empty".into()));
    }

    let outcome = ServiceCatalogRepo::delete_many(&state.pool, &input.ids).await?;
    tracing::info!(
        admin_id = admin.user_id,
        deleted = outcome.deleted_count,
        missing = outcome.missing_ids.len(),
        "service catalog bulk delete"
    );
    Ok(Json(DataResponse { data: outcome }))
}
