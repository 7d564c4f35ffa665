//! User service credential model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use seekr_core::types::{DbId, Timestamp};

/// A row from the `user_service_credential` table: one (service, api key)
/// binding with per-user config overrides.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserServiceCredential {
    pub id: DbId,
    pub user_id: DbId,
    pub user_settings_id: DbId,
    pub service_id: DbId,
    pub api_key_id: DbId,
    pub config: serde_json::Value,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a bulk credential save (upsert on `(service_id, api_key_id)`).
#[derive(Debug, Clone, Deserialize)]
pub struct SaveCredential {
    pub service_id: DbId,
    pub api_key_id: DbId,
    pub config: Option<serde_json::Value>,
    pub is_default: Option<bool>,
}

/// DTO for a bulk credential update. `id` selects the row.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCredential {
    pub id: DbId,
    pub config: Option<serde_json::Value>,
    pub is_default: Option<bool>,
}

/// Row returned by the resolution query: the credential joined with the
/// catalog entry and the encrypted key material it points at.
#[derive(Debug, Clone, FromRow)]
pub struct ResolvedCredential {
    pub credential_id: DbId,
    pub service_id: DbId,
    pub provider: String,
    pub category: String,
    pub default_config: serde_json::Value,
    pub config: serde_json::Value,
    pub is_default: bool,
    pub encrypted_api_key: String,
}
