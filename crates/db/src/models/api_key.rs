//! User API key vault model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use seekr_core::types::{DbId, Timestamp};

/// A row from the `user_api_keys` table.
///
/// **Note:** `encrypted_api_key` is never serialized to responses. List and
/// detail endpoints expose a masked preview computed after decryption.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserApiKey {
    pub id: DbId,
    pub user_id: DbId,
    pub user_settings_id: DbId,
    pub title: String,
    #[serde(skip_serializing)]
    pub encrypted_api_key: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a key. `encrypted_api_key` is the vault ciphertext; the
/// handler encrypts before calling the repository.
#[derive(Debug, Clone)]
pub struct CreateUserApiKey {
    pub title: String,
    pub encrypted_api_key: String,
    /// Active catalog services this key unlocks. Must be non-empty.
    pub service_ids: Vec<DbId>,
}

/// DTO for updating a key. `None` fields are left unchanged; a supplied
/// `service_ids` list fully replaces the key's credential links.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserApiKey {
    pub title: Option<String>,
    pub encrypted_api_key: Option<String>,
    pub is_active: Option<bool>,
    pub service_ids: Option<Vec<DbId>>,
}

/// Join row used when collecting service ids per key.
#[derive(Debug, Clone, FromRow, Deserialize)]
pub struct KeyServiceLink {
    pub api_key_id: DbId,
    pub service_id: DbId,
}
