//! Repository for the `user_settings` table.

use sqlx::PgPool;

use seekr_core::types::DbId;

use crate::models::user_settings::{UpdateUserSettings, UserSettings};

const SETTINGS_COLUMNS: &str = "\
    id, user_id, language_preference, dark_mode_enabled, location, \
    custom_instructions, created_at, updated_at";

/// Provides access to per-user settings, creating the row on first touch.
pub struct UserSettingsRepo;

impl UserSettingsRepo {
    /// Fetch the user's settings, materializing a default row if none exists.
    ///
    /// The INSERT races benignly with itself: on conflict the existing row is
    /// returned.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<UserSettings, sqlx::Error> {
        if let Some(settings) = Self::find_by_user(pool, user_id).await? {
            return Ok(settings);
        }
        let query = format!(
            "INSERT INTO user_settings (user_id) VALUES ($1) \
             ON CONFLICT ON CONSTRAINT uq_user_settings_user_id DO UPDATE \
                 SET user_id = EXCLUDED.user_id \
             RETURNING {SETTINGS_COLUMNS}"
        );
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserSettings>, sqlx::Error> {
        let query = format!("SELECT {SETTINGS_COLUMNS} FROM user_settings WHERE user_id = $1");
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update settings fields. Materializes the row first so an update on a
    /// never-touched account behaves like an update on defaults.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        dto: &UpdateUserSettings,
    ) -> Result<UserSettings, sqlx::Error> {
        Self::get_or_create(pool, user_id).await?;
        let query = format!(
            "UPDATE user_settings SET \
                 language_preference = COALESCE($2, language_preference), \
                 dark_mode_enabled = COALESCE($3, dark_mode_enabled), \
                 location = COALESCE($4, location), \
                 custom_instructions = COALESCE($5, custom_instructions) \
             WHERE user_id = $1 \
             RETURNING {SETTINGS_COLUMNS}"
        );
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .bind(&dto.language_preference)
            .bind(dto.dark_mode_enabled)
            .bind(&dto.location)
            .bind(&dto.custom_instructions)
            .fetch_one(pool)
            .await
    }
}
