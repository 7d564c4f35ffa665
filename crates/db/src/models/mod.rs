pub mod api_key;
pub mod credential;
pub mod service_catalog;
pub mod session;
pub mod user;
pub mod user_settings;
