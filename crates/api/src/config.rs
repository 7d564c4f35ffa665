use seekr_resolver::SystemDefaults;

use crate::auth::google::GoogleOauthConfig;
use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have sensible defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum database pool connections (default: `10`).
    pub database_max_connections: u32,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// 32-byte key material for the API key vault (hex or base64).
    pub api_key_encryption_key: String,
    /// Provider/model defaults for the explicit-api-key resolution path.
    pub defaults: SystemDefaults,
    /// Google OAuth client settings. `None` disables the Google login routes.
    pub google: Option<GoogleOauthConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default                 |
    /// |----------------------------|----------|-------------------------|
    /// | `HOST`                     | no       | `0.0.0.0`               |
    /// | `PORT`                     | no       | `3000`                  |
    /// | `CORS_ORIGINS`             | no       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | no       | `30`                    |
    /// | `DATABASE_MAX_CONNECTIONS` | no       | `10`                    |
    /// | `API_KEY_ENCRYPTION_KEY`   | **yes**  | --                      |
    /// | `DEFAULT_LLM_PROVIDER`     | no       | `openai`                |
    /// | `DEFAULT_LLM_MODEL`        | no       | `gpt-4o-mini`           |
    /// | `GOOGLE_CLIENT_ID`         | no       | -- (disables OAuth)     |
    /// | `GOOGLE_CLIENT_SECRET`     | no       | --                      |
    /// | `GOOGLE_REDIRECT_URI`      | no       | --                      |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics if `API_KEY_ENCRYPTION_KEY` or `JWT_SECRET` is not set, or if a
    /// numeric variable fails to parse.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32");

        let api_key_encryption_key = std::env::var("API_KEY_ENCRYPTION_KEY")
            .expect("API_KEY_ENCRYPTION_KEY must be set in the environment");

        let jwt = JwtConfig::from_env();
        let defaults = system_defaults_from_env();
        let google = GoogleOauthConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_max_connections,
            jwt,
            api_key_encryption_key,
            defaults,
            google,
        }
    }
}

/// Read the resolver's explicit-path defaults, falling back to the built-in
/// [`SystemDefaults`] values for anything unset.
fn system_defaults_from_env() -> SystemDefaults {
    let base = SystemDefaults::default();
    SystemDefaults {
        llm_provider: std::env::var("DEFAULT_LLM_PROVIDER").unwrap_or(base.llm_provider),
        llm_model: std::env::var("DEFAULT_LLM_MODEL").unwrap_or(base.llm_model),
        temperature: std::env::var("DEFAULT_LLM_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(base.temperature),
        max_tokens: std::env::var("DEFAULT_LLM_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(base.max_tokens),
        embedding_provider: std::env::var("DEFAULT_EMBEDDING_PROVIDER")
            .unwrap_or(base.embedding_provider),
        embedding_model: std::env::var("DEFAULT_EMBEDDING_MODEL").unwrap_or(base.embedding_model),
    }
}
