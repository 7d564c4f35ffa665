use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// One or more service ids do not reference an active catalog entry.
    /// Carries the offending ids so the client can correct its request.
    #[error("Invalid or inactive service ids: {service_ids:?}")]
    InvalidServiceReference { service_ids: Vec<DbId> },

    #[error("Internal error: {0}")]
    Internal(String),
}
