//! User account model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use seekr_core::types::{DbId, Timestamp};

/// A row from the `users` table.
///
/// **Note:** `password_hash` is never serialized to responses. It is NULL for
/// accounts created through Google OAuth only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    #[serde(skip_serializing)]
    pub google_id: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for password-based registration.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    /// Argon2 hash, computed by the caller.
    pub password_hash: String,
    pub full_name: Option<String>,
}

/// DTO for OAuth-based account creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOauthUser {
    pub email: String,
    pub username: String,
    pub google_id: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// DTO for profile updates. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}
