use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use seekr_agent::AgentError;
use seekr_core::error::CoreError;
use seekr_core::vault::VaultError;
use seekr_db::DbError;
use seekr_resolver::ResolveError;

use crate::auth::google::GoogleAuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, database, vault, resolution, and agent error types and
/// implements [`IntoResponse`] to produce consistent `{ "error", "code" }`
/// JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `seekr_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A credential resolution failure.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// An encryption/decryption failure from the key vault.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// A query agent failure.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// A Google OAuth flow failure.
    #[error(transparent)]
    GoogleAuth(#[from] GoogleAuthError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(e) => AppError::Database(e),
            DbError::Domain(e) => AppError::Core(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Resolve(err) => classify_resolve_error(err),

            AppError::Vault(err) => {
                tracing::error!(error = %err, "Vault error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "VAULT_ERROR",
                    "An internal error occurred".to_string(),
                )
            }

            AppError::Agent(err) => match err {
                AgentError::Resolve(inner) => classify_resolve_error(inner),
                AgentError::Adapter(inner) => {
                    tracing::error!(error = %inner, "Upstream provider error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_ERROR",
                        "An upstream provider request failed".to_string(),
                    )
                }
            },

            AppError::GoogleAuth(err) => {
                tracing::error!(error = %err, "Google OAuth error");
                (
                    StatusCode::BAD_GATEWAY,
                    "OAUTH_ERROR",
                    "Google sign-in failed".to_string(),
                )
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::InvalidServiceReference { service_ids } => (
            StatusCode::BAD_REQUEST,
            "INVALID_SERVICE_REFERENCE",
            format!("Invalid or inactive service ids: {service_ids:?}"),
        ),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

fn classify_resolve_error(err: &ResolveError) -> (StatusCode, &'static str, String) {
    match err {
        ResolveError::NoCredentialConfigured { category } => (
            StatusCode::NOT_FOUND,
            "NO_CREDENTIAL",
            format!("No credential configured for category '{category}'"),
        ),
        // A provider name the registry does not know is a server
        // configuration gap, not a client mistake.
        ResolveError::Registry(inner) => {
            tracing::error!(error = %inner, "Adapter registry error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UNKNOWN_PROVIDER",
                "An internal error occurred".to_string(),
            )
        }
        ResolveError::Vault(inner) => {
            tracing::error!(error = %inner, "Vault error during resolution");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "VAULT_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        ResolveError::Database(inner) => classify_sqlx_error(inner),
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
