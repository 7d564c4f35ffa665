//! Refresh-token session model.

use serde::Serialize;
use sqlx::FromRow;

use seekr_core::types::{DbId, Timestamp};

/// A row from the `login_sessions` table.
///
/// Stores the SHA-256 hash of the refresh token, never the token itself.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LoginSession {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked: bool,
    pub created_at: Timestamp,
}
