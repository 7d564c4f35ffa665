//! Handlers for the `/auth` resource (register, login, refresh, logout,
//! Google OAuth).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use seekr_core::error::CoreError;
use seekr_core::types::roles::{ROLE_ADMIN, ROLE_USER};
use seekr_core::types::DbId;
use seekr_db::models::user::{CreateOauthUser, CreateUser, User};
use seekr_db::repositories::{SessionRepo, UserRepo};

use crate::auth::google::{self, GoogleUserInfo};
use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 3, max = 64, message = "must be 3 to 64 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    pub full_name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by register, login, refresh,
/// and the OAuth callback.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
}

/// Response for `GET /auth/google/login-url`.
#[derive(Debug, Serialize)]
pub struct GoogleLoginUrl {
    pub authorization_url: String,
    pub state: String,
}

/// Query parameters Google appends to the callback redirect.
#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: String,
    #[allow(dead_code)]
    pub state: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a password-based account and log it in. Duplicate email or
/// username surfaces as 409 via the unique-constraint classifier.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let dto = CreateUser {
        email: input.email,
        username: input.username,
        password_hash,
        full_name: input.full_name,
    };
    let user = UserRepo::create(&state.pool, &dto).await?;
    tracing::info!(user_id = user.id, "user registered");

    let response = create_auth_response(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // Google-only accounts have no password hash to check against.
    let stored_hash = user.password_hash.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
    })?;

    let password_valid = verify_password(&input.password, stored_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The old
/// session is revoked (token rotation).
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_live_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/google/login-url
///
/// Return the Google authorization URL plus the anti-forgery `state` value
/// the client must check on callback.
pub async fn google_login_url(State(state): State<AppState>) -> AppResult<Json<GoogleLoginUrl>> {
    let config = state.config.google.as_ref().ok_or_else(|| {
        AppError::BadRequest("Google sign-in is not configured on this server".into())
    })?;

    let oauth_state = Uuid::new_v4().to_string();
    let authorization_url = google::authorization_url(config, &oauth_state);

    Ok(Json(GoogleLoginUrl {
        authorization_url,
        state: oauth_state,
    }))
}

/// GET /api/v1/auth/google/callback
///
/// Exchange the authorization code, then sign the Google account in:
/// an existing `google_id` match logs straight in, an email match links the
/// Google account, anything else creates a fresh account.
pub async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<GoogleCallbackQuery>,
) -> AppResult<Json<AuthResponse>> {
    let config = state.config.google.as_ref().ok_or_else(|| {
        AppError::BadRequest("Google sign-in is not configured on this server".into())
    })?;

    let info = google::fetch_user_info(&state.http, config, &params.code).await?;

    let user = match UserRepo::find_by_google_id(&state.pool, &info.id).await? {
        Some(user) => user,
        None => match UserRepo::find_by_email(&state.pool, &info.email).await? {
            Some(user) => UserRepo::link_google_id(&state.pool, user.id, &info.id)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
                })?,
            None => create_google_user(&state, &info).await?,
        },
    };

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Role name for JWT claims, derived from the admin flag.
fn role_of(user: &User) -> &'static str {
    if user.is_admin {
        ROLE_ADMIN
    } else {
        ROLE_USER
    }
}

/// Create an account for a first-time Google sign-in.
///
/// The username defaults to the email local part; on collision we retry once
/// with the Google account id appended.
async fn create_google_user(state: &AppState, info: &GoogleUserInfo) -> AppResult<User> {
    let local_part = info.email.split('@').next().unwrap_or(&info.email);

    let dto = CreateOauthUser {
        email: info.email.clone(),
        username: local_part.to_string(),
        google_id: info.id.clone(),
        full_name: info.name.clone(),
        avatar_url: info.picture.clone(),
    };

    match UserRepo::create_oauth(&state.pool, &dto).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "google account created");
            Ok(user)
        }
        Err(err) if is_username_conflict(&err) => {
            let retry = CreateOauthUser {
                username: format!("{}_{}", local_part, info.id),
                ..dto
            };
            let user = UserRepo::create_oauth(&state.pool, &retry).await?;
            tracing::info!(user_id = user.id, "google account created (suffixed username)");
            Ok(user)
        }
        Err(err) => Err(err.into()),
    }
}

fn is_username_conflict(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("uq_users_username")
    )
}

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let role = role_of(user);

    let access_token = generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);
    SessionRepo::create(&state.pool, user.id, &refresh_hash, expires_at).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user: UserInfo {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: role.to_string(),
        },
    })
}
