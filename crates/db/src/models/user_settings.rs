//! Per-user settings model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use seekr_core::types::{DbId, Timestamp};

/// A row from the `user_settings` table (1-1 with `users`, lazily created).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSettings {
    pub id: DbId,
    pub user_id: DbId,
    pub language_preference: String,
    pub dark_mode_enabled: bool,
    pub location: Option<String>,
    pub custom_instructions: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for settings updates. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserSettings {
    pub language_preference: Option<String>,
    pub dark_mode_enabled: Option<bool>,
    pub location: Option<String>,
    pub custom_instructions: Option<String>,
}
