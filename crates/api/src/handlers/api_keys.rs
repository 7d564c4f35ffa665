//! Handlers for the `/api-keys` resource (the user's encrypted key vault).
//!
//! Plaintext keys exist only inside a request: they arrive in a create or
//! update body, get encrypted immediately, and leave only as masked previews.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use seekr_core::error::CoreError;
use seekr_core::types::DbId;
use seekr_core::vault::{mask_secret, MASK_PLACEHOLDER};
use seekr_db::models::api_key::{CreateUserApiKey, UpdateUserApiKey, UserApiKey};
use seekr_db::models::service_catalog::ServiceCatalogEntry;
use seekr_db::repositories::{ApiKeyRepo, ServiceCatalogRepo, UserSettingsRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// How many trailing plaintext characters a masked preview keeps.
const MASK_VISIBLE_TAIL: usize = 4;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api-keys`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateApiKeyRequest {
    #[validate(length(min = 1, max = 128, message = "must be 1 to 128 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub api_key: String,
    /// Active catalog services this key unlocks. Must be non-empty.
    pub service_ids: Vec<DbId>,
}

/// Request body for `PUT /api-keys/{id}`. Omitted fields are left unchanged;
/// a supplied `service_ids` list fully replaces the key's links.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateApiKeyRequest {
    pub title: Option<String>,
    pub api_key: Option<String>,
    pub is_active: Option<bool>,
    pub service_ids: Option<Vec<DbId>>,
}

/// List item: the key row plus a masked preview and linked service ids.
#[derive(Debug, Serialize)]
pub struct ApiKeyItem {
    #[serde(flatten)]
    pub key: UserApiKey,
    pub masked_key: String,
    pub service_ids: Vec<DbId>,
}

/// Detail view: like [`ApiKeyItem`] but with full catalog entries.
#[derive(Debug, Serialize)]
pub struct ApiKeyDetail {
    #[serde(flatten)]
    pub key: UserApiKey,
    pub masked_key: String,
    pub services: Vec<ServiceCatalogEntry>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/api-keys
///
/// All of the user's keys with masked previews and linked service ids.
pub async fn list_api_keys(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ApiKeyItem>>>> {
    let keys = ApiKeyRepo::list_by_user(&state.pool, auth_user.user_id).await?;
    let links = ApiKeyRepo::service_links_for_user(&state.pool, auth_user.user_id).await?;

    let mut services_by_key: HashMap<DbId, Vec<DbId>> = HashMap::new();
    for link in links {
        services_by_key
            .entry(link.api_key_id)
            .or_default()
            .push(link.service_id);
    }

    let items = keys
        .into_iter()
        .map(|key| {
            let masked_key = masked_preview(&state, &key);
            let service_ids = services_by_key.remove(&key.id).unwrap_or_default();
            ApiKeyItem {
                key,
                masked_key,
                service_ids,
            }
        })
        .collect();

    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/api-keys/{id}
pub async fn get_api_key(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(key_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ApiKeyDetail>>> {
    let key = ApiKeyRepo::find_by_id_for_user(&state.pool, auth_user.user_id, key_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "api key",
            id: key_id,
        }))?;

    let detail = detail_for(&state, key).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/api-keys
///
/// Encrypts the plaintext key and links it to the given services in one
/// transaction. Invalid or inactive service ids fail the whole request.
pub async fn create_api_key(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateApiKeyRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ApiKeyDetail>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let encrypted_api_key = state.vault.encrypt(&input.api_key)?;
    let settings = UserSettingsRepo::get_or_create(&state.pool, auth_user.user_id).await?;

    let dto = CreateUserApiKey {
        title: input.title,
        encrypted_api_key,
        service_ids: input.service_ids,
    };
    let key =
        ApiKeyRepo::create_with_services(&state.pool, auth_user.user_id, settings.id, &dto).await?;

    let detail = detail_for(&state, key).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/v1/api-keys/{id}
pub async fn update_api_key(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(key_id): Path<DbId>,
    Json(input): Json<UpdateApiKeyRequest>,
) -> AppResult<Json<DataResponse<ApiKeyDetail>>> {
    let encrypted_api_key = match &input.api_key {
        Some(plaintext) => Some(state.vault.encrypt(plaintext)?),
        None => None,
    };

    let dto = UpdateUserApiKey {
        title: input.title,
        encrypted_api_key,
        is_active: input.is_active,
        service_ids: input.service_ids,
    };
    let key = ApiKeyRepo::update(&state.pool, auth_user.user_id, key_id, &dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "api key",
            id: key_id,
        }))?;

    let detail = detail_for(&state, key).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/api-keys/{id}
///
/// Credential links go with the key via FK cascade. Returns 204 No Content.
pub async fn delete_api_key(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(key_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ApiKeyRepo::delete(&state.pool, auth_user.user_id, key_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "api key",
            id: key_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Masked preview of a stored key. Undecryptable ciphertext (key rotation,
/// corruption) collapses to the bare placeholder instead of failing the
/// response.
fn masked_preview(state: &AppState, key: &UserApiKey) -> String {
    match state.vault.decrypt(&key.encrypted_api_key) {
        Ok(plaintext) => mask_secret(&plaintext, MASK_VISIBLE_TAIL),
        Err(err) => {
            tracing::warn!(api_key_id = key.id, error = %err, "stored api key is undecryptable");
            MASK_PLACEHOLDER.to_string()
        }
    }
}

async fn detail_for(state: &AppState, key: UserApiKey) -> AppResult<ApiKeyDetail> {
    let masked_key = masked_preview(state, &key);
    let service_ids = ApiKeyRepo::service_ids_for_key(&state.pool, key.id).await?;
    let services = ServiceCatalogRepo::find_by_ids(&state.pool, &service_ids).await?;

    Ok(ApiKeyDetail {
        key,
        masked_key,
        services,
    })
}
