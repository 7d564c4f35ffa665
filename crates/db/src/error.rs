use seekr_core::error::CoreError;

/// Error type for repository operations that perform domain validation on top
/// of plain SQL. Pure CRUD methods return [`sqlx::Error`] directly.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Domain(#[from] CoreError),
}
