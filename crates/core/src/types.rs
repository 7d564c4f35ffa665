/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// JSON object used for catalog `default_config` and per-credential overrides.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Service catalog category slugs.
///
/// These are the values stored in `service_catalog.category` and the keys the
/// resolution facade looks credentials up by.
pub mod categories {
    pub const LLM: &str = "llm";
    pub const EMBEDDING: &str = "embedding";
    pub const VECTOR_STORE: &str = "vector_store";
    pub const SEARCH: &str = "search";
    pub const SCRAPER: &str = "scraper";
    pub const STORAGE: &str = "storage";
}

/// Role names carried in JWT claims.
pub mod roles {
    pub const ROLE_ADMIN: &str = "admin";
    pub const ROLE_USER: &str = "user";
}
