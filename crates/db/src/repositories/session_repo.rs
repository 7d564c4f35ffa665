//! Repository for the `login_sessions` table.

use sqlx::PgPool;

use seekr_core::types::{DbId, Timestamp};

use crate::models::session::LoginSession;

const SESSION_COLUMNS: &str =
    "id, user_id, refresh_token_hash, expires_at, revoked, created_at";

/// Provides refresh-token session bookkeeping.
pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        refresh_token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<LoginSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO login_sessions (user_id, refresh_token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, LoginSession>(&query)
            .bind(user_id)
            .bind(refresh_token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a live session by token hash: not revoked and not expired.
    pub async fn find_live_by_hash(
        pool: &PgPool,
        refresh_token_hash: &str,
    ) -> Result<Option<LoginSession>, sqlx::Error> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM login_sessions \
             WHERE refresh_token_hash = $1 AND NOT revoked AND expires_at > NOW()"
        );
        sqlx::query_as::<_, LoginSession>(&query)
            .bind(refresh_token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke one session. Returns `true` if a row changed.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE login_sessions SET revoked = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every session for a user (logout-everywhere).
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE login_sessions SET revoked = TRUE WHERE user_id = $1")
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Delete sessions past their expiry. Returns the number removed.
    pub async fn prune_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM login_sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
