//! Repository for the `user_api_keys` table and its credential links.
//!
//! Key creation and the full-replace service-list update are atomic: either
//! the key and every credential row land together, or nothing does.

use sqlx::{PgPool, Postgres, Transaction};

use seekr_core::error::CoreError;
use seekr_core::types::DbId;

use crate::error::DbError;
use crate::models::api_key::{
    CreateUserApiKey, KeyServiceLink, UpdateUserApiKey, UserApiKey,
};

const KEY_COLUMNS: &str = "\
    id, user_id, user_settings_id, title, encrypted_api_key, is_active, \
    created_at, updated_at";

/// Provides vault-key CRUD with service-reference validation.
pub struct ApiKeyRepo;

impl ApiKeyRepo {
    /// Create a key bound to a non-empty set of active catalog services.
    ///
    /// Every id must reference an existing, active catalog row; otherwise the
    /// whole create fails with [`CoreError::InvalidServiceReference`] carrying
    /// the offending ids, and no rows are written.
    pub async fn create_with_services(
        pool: &PgPool,
        user_id: DbId,
        user_settings_id: DbId,
        dto: &CreateUserApiKey,
    ) -> Result<UserApiKey, DbError> {
        if dto.service_ids.is_empty() {
            return Err(CoreError::InvalidInput(
                "an api key must be linked to at least one service".into(),
            )
            .into());
        }

        let mut tx = pool.begin().await?;
        Self::check_service_references(&mut tx, &dto.service_ids).await?;

        let query = format!(
            "INSERT INTO user_api_keys (user_id, user_settings_id, title, encrypted_api_key) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {KEY_COLUMNS}"
        );
        let key = sqlx::query_as::<_, UserApiKey>(&query)
            .bind(user_id)
            .bind(user_settings_id)
            .bind(&dto.title)
            .bind(&dto.encrypted_api_key)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_credentials(&mut tx, &key, &dto.service_ids).await?;
        tx.commit().await?;

        tracing::info!(user_id, api_key_id = key.id, "api key created");
        Ok(key)
    }

    /// Update a key's fields and, when `service_ids` is supplied, fully
    /// replace its credential links with the new validated list.
    ///
    /// Returns `None` when the key does not exist or belongs to another user.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        key_id: DbId,
        dto: &UpdateUserApiKey,
    ) -> Result<Option<UserApiKey>, DbError> {
        if let Some(service_ids) = &dto.service_ids {
            if service_ids.is_empty() {
                return Err(CoreError::InvalidInput(
                    "an api key must be linked to at least one service".into(),
                )
                .into());
            }
        }

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE user_api_keys SET \
                 title = COALESCE($3, title), \
                 encrypted_api_key = COALESCE($4, encrypted_api_key), \
                 is_active = COALESCE($5, is_active) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {KEY_COLUMNS}"
        );
        let Some(key) = sqlx::query_as::<_, UserApiKey>(&query)
            .bind(key_id)
            .bind(user_id)
            .bind(&dto.title)
            .bind(&dto.encrypted_api_key)
            .bind(dto.is_active)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(service_ids) = &dto.service_ids {
            Self::check_service_references(&mut tx, service_ids).await?;
            sqlx::query("DELETE FROM user_service_credential WHERE api_key_id = $1")
                .bind(key.id)
                .execute(&mut *tx)
                .await?;
            Self::insert_credentials(&mut tx, &key, service_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(key))
    }

    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<UserApiKey>, sqlx::Error> {
        let query = format!(
            "SELECT {KEY_COLUMNS} FROM user_api_keys WHERE user_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, UserApiKey>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find a key only if it belongs to `user_id`.
    pub async fn find_by_id_for_user(
        pool: &PgPool,
        user_id: DbId,
        key_id: DbId,
    ) -> Result<Option<UserApiKey>, sqlx::Error> {
        let query = format!(
            "SELECT {KEY_COLUMNS} FROM user_api_keys WHERE id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, UserApiKey>(&query)
            .bind(key_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a key. Credential links go with it via FK cascade. Returns
    /// `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId, key_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_api_keys WHERE id = $1 AND user_id = $2")
            .bind(key_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Service ids linked to a key, in id order.
    pub async fn service_ids_for_key(
        pool: &PgPool,
        key_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT service_id FROM user_service_credential \
             WHERE api_key_id = $1 ORDER BY service_id",
        )
        .bind(key_id)
        .fetch_all(pool)
        .await
    }

    /// Service ids for every key of a user, one round trip for list views.
    pub async fn service_links_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<KeyServiceLink>, sqlx::Error> {
        sqlx::query_as::<_, KeyServiceLink>(
            "SELECT api_key_id, service_id FROM user_service_credential \
             WHERE user_id = $1 ORDER BY api_key_id, service_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    // ---- private helpers ----

    /// Fail with the offending ids unless every id names an active catalog row.
    async fn check_service_references(
        tx: &mut Transaction<'_, Postgres>,
        service_ids: &[DbId],
    ) -> Result<(), DbError> {
        let found: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM service_catalog WHERE id = ANY($1) AND is_active",
        )
        .bind(service_ids)
        .fetch_all(&mut **tx)
        .await?;

        let invalid: Vec<DbId> = service_ids
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidServiceReference {
                service_ids: invalid,
            }
            .into())
        }
    }

    async fn insert_credentials(
        tx: &mut Transaction<'_, Postgres>,
        key: &UserApiKey,
        service_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        for service_id in service_ids {
            sqlx::query(
                "INSERT INTO user_service_credential \
                     (user_id, user_settings_id, service_id, api_key_id) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT ON CONSTRAINT uq_user_service_credential_service_key \
                     DO NOTHING",
            )
            .bind(key.user_id)
            .bind(key.user_settings_id)
            .bind(service_id)
            .bind(key.id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
