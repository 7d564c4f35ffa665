//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to the repositories in `seekr_db` and map errors via
//! [`crate::error::AppError`].

pub mod api_keys;
pub mod auth;
pub mod credentials;
pub mod profile;
pub mod query;
pub mod service_catalog;
pub mod settings;
