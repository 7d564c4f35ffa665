//! Repository for the `users` table.

use sqlx::PgPool;

use seekr_core::types::DbId;

use crate::models::user::{CreateOauthUser, CreateUser, UpdateProfile, User};

const USER_COLUMNS: &str = "\
    id, email, username, password_hash, google_id, full_name, avatar_url, \
    is_active, is_admin, created_at, updated_at";

/// Provides CRUD operations for user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Create a password-based account.
    pub async fn create(pool: &PgPool, dto: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, username, password_hash, full_name) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&dto.email)
            .bind(&dto.username)
            .bind(&dto.password_hash)
            .bind(&dto.full_name)
            .fetch_one(pool)
            .await
    }

    /// Create an account from a Google OAuth identity (no password).
    pub async fn create_oauth(
        pool: &PgPool,
        dto: &CreateOauthUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, username, google_id, full_name, avatar_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&dto.email)
            .bind(&dto.username)
            .bind(&dto.google_id)
            .bind(&dto.full_name)
            .bind(&dto.avatar_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_google_id(
        pool: &PgPool,
        google_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE google_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(google_id)
            .fetch_optional(pool)
            .await
    }

    /// Attach a Google identity to an existing password account.
    pub async fn link_google_id(
        pool: &PgPool,
        id: DbId,
        google_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET google_id = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(google_id)
            .fetch_optional(pool)
            .await
    }

    /// Update profile fields. `None` fields are left unchanged.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                 username = COALESCE($2, username), \
                 full_name = COALESCE($3, full_name), \
                 avatar_url = COALESCE($4, avatar_url) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&dto.username)
            .bind(&dto.full_name)
            .bind(&dto.avatar_url)
            .fetch_optional(pool)
            .await
    }
}
