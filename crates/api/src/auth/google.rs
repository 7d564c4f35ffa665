//! Google OAuth 2.0 authorization-code flow.
//!
//! The server only brokers the flow: it hands the client an authorization
//! URL, then exchanges the returned code for an access token and fetches the
//! user's profile. No Google tokens are persisted.

use reqwest::Url;
use serde::Deserialize;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Google OAuth client settings, loaded from the environment.
#[derive(Debug, Clone)]
pub struct GoogleOauthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl GoogleOauthConfig {
    /// Read `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, and
    /// `GOOGLE_REDIRECT_URI`. Returns `None` unless all three are set, which
    /// disables the Google login routes.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID").ok()?;
        let client_secret = std::env::var("GOOGLE_CLIENT_SECRET").ok()?;
        let redirect_uri = std::env::var("GOOGLE_REDIRECT_URI").ok()?;
        Some(Self {
            client_id,
            client_secret,
            redirect_uri,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GoogleAuthError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Google refused the code exchange or userinfo request.
    #[error("google oauth request failed ({status}): {body}")]
    Upstream { status: u16, body: String },
}

/// Profile fields from the v2 userinfo endpoint. `id` is the stable Google
/// account id stored as `users.google_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Build the authorization URL the client is redirected to.
///
/// The `state` value is round-tripped by Google and must be checked by the
/// client against the value returned alongside this URL.
pub fn authorization_url(config: &GoogleOauthConfig, state: &str) -> String {
    // Static base URL plus percent-encoded query pairs; cannot fail.
    let url = Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "openid email profile"),
            ("state", state),
            ("access_type", "offline"),
        ],
    );
    match url {
        Ok(url) => url.to_string(),
        Err(_) => AUTHORIZE_URL.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange an authorization code for the user's profile.
pub async fn fetch_user_info(
    http: &reqwest::Client,
    config: &GoogleOauthConfig,
    code: &str,
) -> Result<GoogleUserInfo, GoogleAuthError> {
    let response = http
        .post(TOKEN_URL)
        .form(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
        ])
        .send()
        .await?;
    let token: TokenResponse = parse_response(response).await?;

    let response = http
        .get(USERINFO_URL)
        .bearer_auth(&token.access_token)
        .send()
        .await?;
    parse_response(response).await
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GoogleAuthError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GoogleAuthError::Upstream {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GoogleOauthConfig {
        GoogleOauthConfig {
            client_id: "client-123".to_string(),
            client_secret: "shh".to_string(),
            redirect_uri: "http://localhost:5173/auth/callback".to_string(),
        }
    }

    #[test]
    fn authorization_url_carries_client_and_state() {
        let url = authorization_url(&test_config(), "state-abc");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("state=state-abc"));
        assert!(url.contains("scope=openid+email+profile"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn authorization_url_percent_encodes_the_redirect() {
        let url = authorization_url(&test_config(), "s");
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A5173%2Fauth%2Fcallback"));
    }

    #[test]
    fn client_secret_never_appears_in_the_authorization_url() {
        let url = authorization_url(&test_config(), "s");
        assert!(!url.contains("shh"));
    }
}
