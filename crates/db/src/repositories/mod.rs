pub mod api_key_repo;
pub mod credential_repo;
pub mod service_catalog_repo;
pub mod session_repo;
pub mod user_repo;
pub mod user_settings_repo;

pub use api_key_repo::ApiKeyRepo;
pub use credential_repo::CredentialRepo;
pub use service_catalog_repo::ServiceCatalogRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use user_settings_repo::UserSettingsRepo;
