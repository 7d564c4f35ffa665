//! Handlers for the `/credentials` resource: per-user (service, api key)
//! bindings with config overrides.
//!
//! Mutations are bulk with per-item outcomes, mirroring the admin catalog
//! endpoints. Everything is scoped to the authenticated user.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use seekr_core::error::CoreError;
use seekr_core::types::DbId;
use seekr_db::models::credential::{SaveCredential, UpdateCredential, UserServiceCredential};
use seekr_db::repositories::{CredentialRepo, UserSettingsRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{bulk_response, DataResponse};
use crate::state::AppState;

/// Request body for `DELETE /credentials`.
#[derive(Debug, Deserialize)]
pub struct IdList {
    pub ids: Vec<DbId>,
}

/// GET /api/v1/credentials
pub async fn list_credentials(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserServiceCredential>>>> {
    let credentials = CredentialRepo::list_by_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: credentials }))
}

/// GET /api/v1/credentials/{id}
pub async fn get_credential(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(credential_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserServiceCredential>>> {
    let credential =
        CredentialRepo::find_by_id_for_user(&state.pool, auth_user.user_id, credential_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "credential",
                id: credential_id,
            }))?;

    Ok(Json(DataResponse { data: credential }))
}

/// POST /api/v1/credentials
///
/// Bulk save: upserts on `(service_id, api_key_id)`. Items referencing an
/// inactive or foreign key, or an inactive service, fail individually.
pub async fn bulk_save_credentials(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(items): Json<Vec<SaveCredential>>,
) -> AppResult<Response> {
    if items.is_empty() {
        return Err(AppError::BadRequest("Batch must not be empty".into()));
    }

    let settings = UserSettingsRepo::get_or_create(&state.pool, auth_user.user_id).await?;
    let outcome =
        CredentialRepo::save_bulk(&state.pool, auth_user.user_id, settings.id, &items).await?;
    Ok(bulk_response(outcome))
}

/// PUT /api/v1/credentials
///
/// Bulk update by id. Ids missing for this user fail their item.
pub async fn bulk_update_credentials(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(items): Json<Vec<UpdateCredential>>,
) -> AppResult<Response> {
    if items.is_empty() {
        return Err(AppError::BadRequest("Batch must not be empty".into()));
    }

    let outcome = CredentialRepo::bulk_update(&state.pool, auth_user.user_id, &items).await?;
    Ok(bulk_response(outcome))
}

/// DELETE /api/v1/credentials
///
/// Bulk delete by id, scoped to the user. Missing ids are reported in the
/// outcome, not as an error.
pub async fn bulk_delete_credentials(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<IdList>,
) -> AppResult<Json<DataResponse<seekr_core::bulk::DeleteOutcome>>> {
    if input.ids.is_empty() {
        return Err(AppError::BadRequest("Batch must not be empty".into()));
    }

    let outcome = CredentialRepo::delete_many(&state.pool, auth_user.user_id, &input.ids).await?;
    Ok(Json(DataResponse { data: outcome }))
}
