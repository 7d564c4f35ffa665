//! Repository for the `user_service_credential` table.
//!
//! Credentials bind one of the user's vault keys to one catalog service with
//! optional config overrides. Bulk saves upsert on `(service_id, api_key_id)`
//! so re-saving the same pair updates it in place.

use sqlx::{PgPool, Postgres, Transaction};

use seekr_core::bulk::{BulkError, BulkOutcome, DeleteOutcome};
use seekr_core::types::DbId;

use crate::models::credential::{
    ResolvedCredential, SaveCredential, UpdateCredential, UserServiceCredential,
};

const CREDENTIAL_COLUMNS: &str = "\
    id, user_id, user_settings_id, service_id, api_key_id, config, \
    is_default, created_at, updated_at";

/// Provides credential CRUD and the resolver's lookup query.
pub struct CredentialRepo;

impl CredentialRepo {
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserServiceCredential>, sqlx::Error> {
        let query = format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM user_service_credential \
             WHERE user_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, UserServiceCredential>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id_for_user(
        pool: &PgPool,
        user_id: DbId,
        credential_id: DbId,
    ) -> Result<Option<UserServiceCredential>, sqlx::Error> {
        let query = format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM user_service_credential \
             WHERE id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, UserServiceCredential>(&query)
            .bind(credential_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Upsert many credentials for a user in one transaction.
    ///
    /// Per-item validation failures (foreign api key, inactive key, unknown
    /// or inactive service) are collected by index; the valid subset commits.
    pub async fn save_bulk(
        pool: &PgPool,
        user_id: DbId,
        user_settings_id: DbId,
        items: &[SaveCredential],
    ) -> Result<BulkOutcome<UserServiceCredential>, sqlx::Error> {
        let mut outcome = BulkOutcome::default();
        let mut tx = pool.begin().await?;

        for (index, item) in items.iter().enumerate() {
            if !Self::key_usable(&mut tx, user_id, item.api_key_id).await? {
                outcome.errors.push(BulkError::new(
                    index,
                    format!("api key {} not found or inactive", item.api_key_id),
                ));
                continue;
            }
            if !Self::service_active(&mut tx, item.service_id).await? {
                outcome.errors.push(BulkError::new(
                    index,
                    format!("service {} not found or inactive", item.service_id),
                ));
                continue;
            }

            let query = format!(
                "INSERT INTO user_service_credential \
                     (user_id, user_settings_id, service_id, api_key_id, config, is_default) \
                 VALUES ($1, $2, $3, $4, COALESCE($5, '{{}}'::JSONB), COALESCE($6, FALSE)) \
                 ON CONFLICT ON CONSTRAINT uq_user_service_credential_service_key \
                     DO UPDATE SET \
                         config = COALESCE($5, user_service_credential.config), \
                         is_default = COALESCE($6, user_service_credential.is_default) \
                 RETURNING {CREDENTIAL_COLUMNS}"
            );
            let credential = sqlx::query_as::<_, UserServiceCredential>(&query)
                .bind(user_id)
                .bind(user_settings_id)
                .bind(item.service_id)
                .bind(item.api_key_id)
                .bind(&item.config)
                .bind(item.is_default)
                .fetch_one(&mut *tx)
                .await?;
            outcome.items.push(credential);
        }

        tx.commit().await?;
        Ok(outcome)
    }

    /// Update many credentials by id. Ids missing for this user are collected
    /// as indexed errors.
    pub async fn bulk_update(
        pool: &PgPool,
        user_id: DbId,
        items: &[UpdateCredential],
    ) -> Result<BulkOutcome<UserServiceCredential>, sqlx::Error> {
        let mut outcome = BulkOutcome::default();
        let mut tx = pool.begin().await?;

        for (index, item) in items.iter().enumerate() {
            let query = format!(
                "UPDATE user_service_credential SET \
                     config = COALESCE($3, config), \
                     is_default = COALESCE($4, is_default) \
                 WHERE id = $1 AND user_id = $2 \
                 RETURNING {CREDENTIAL_COLUMNS}"
            );
            let updated = sqlx::query_as::<_, UserServiceCredential>(&query)
                .bind(item.id)
                .bind(user_id)
                .bind(&item.config)
                .bind(item.is_default)
                .fetch_optional(&mut *tx)
                .await?;

            match updated {
                Some(credential) => outcome.items.push(credential),
                None => outcome.errors.push(BulkError::new(
                    index,
                    format!("credential {} not found", item.id),
                )),
            }
        }

        tx.commit().await?;
        Ok(outcome)
    }

    /// Delete the user's credentials by id. Missing ids are reported, not
    /// errors.
    pub async fn delete_many(
        pool: &PgPool,
        user_id: DbId,
        ids: &[DbId],
    ) -> Result<DeleteOutcome, sqlx::Error> {
        let found: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM user_service_credential WHERE id = ANY($1) AND user_id = $2",
        )
        .bind(ids)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let result =
            sqlx::query("DELETE FROM user_service_credential WHERE id = ANY($1) AND user_id = $2")
                .bind(&found)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(DeleteOutcome::from_requested(
            ids,
            &found,
            result.rows_affected(),
        ))
    }

    /// The resolver's query: the user's credentials for a capability
    /// category, restricted to active keys and active catalog entries,
    /// defaults first then oldest. The first row wins.
    pub async fn find_for_resolution(
        pool: &PgPool,
        user_id: DbId,
        category: &str,
    ) -> Result<Vec<ResolvedCredential>, sqlx::Error> {
        sqlx::query_as::<_, ResolvedCredential>(
            "SELECT c.id AS credential_id, c.service_id, s.provider, s.category, \
                    s.default_config, c.config, c.is_default, k.encrypted_api_key \
             FROM user_service_credential c \
             JOIN service_catalog s ON c.service_id = s.id \
             JOIN user_api_keys k ON c.api_key_id = k.id \
             WHERE c.user_id = $1 \
               AND s.category = $2 \
               AND s.is_active \
               AND k.is_active \
             ORDER BY c.is_default DESC, c.id ASC",
        )
        .bind(user_id)
        .bind(category)
        .fetch_all(pool)
        .await
    }

    // ---- private helpers ----

    /// True when the key exists, belongs to the user, and is active.
    async fn key_usable(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        api_key_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS( \
                 SELECT 1 FROM user_api_keys \
                 WHERE id = $1 AND user_id = $2 AND is_active)",
        )
        .bind(api_key_id)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
    }

    async fn service_active(
        tx: &mut Transaction<'_, Postgres>,
        service_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM service_catalog WHERE id = $1 AND is_active)",
        )
        .bind(service_id)
        .fetch_one(&mut **tx)
        .await
    }
}
