//! Handlers for the `/profile` resource.

use axum::extract::State;
use axum::Json;

use seekr_core::error::CoreError;
use seekr_db::models::user::{UpdateProfile, User};
use seekr_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth_user.user_id,
        }))?;

    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/profile
///
/// Partial update; omitted fields are left unchanged. A username already in
/// use surfaces as 409 via the unique-constraint classifier.
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<User>>> {
    if let Some(username) = &input.username {
        if username.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "username must not be empty".into(),
            )));
        }
    }

    let user = UserRepo::update_profile(&state.pool, auth_user.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth_user.user_id,
        }))?;

    Ok(Json(DataResponse { data: user }))
}
