//! Handlers for the `/settings` resource.
//!
//! Settings rows are created lazily: the first read materializes a row with
//! defaults, so accounts registered before the settings table existed behave
//! the same as new ones.

use axum::extract::State;
use axum::Json;

use seekr_db::models::user_settings::{UpdateUserSettings, UserSettings};
use seekr_db::repositories::UserSettingsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings
pub async fn get_settings(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserSettings>>> {
    let settings = UserSettingsRepo::get_or_create(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/settings
///
/// Partial update; omitted fields are left unchanged.
pub async fn update_settings(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdateUserSettings>,
) -> AppResult<Json<DataResponse<UserSettings>>> {
    let settings = UserSettingsRepo::update(&state.pool, auth_user.user_id, &input).await?;
    Ok(Json(DataResponse { data: settings }))
}
