//! Google People API configuration.

use std::path::PathBuf;
use std::time::Duration;

/// OAuth 2.0 client credentials.
///
/// Used for the refresh request when the token file does not carry its own
/// client id and secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    /// The OAuth 2.0 client ID from Google Cloud Console.
    pub client_id: String,
    /// The OAuth 2.0 client secret from Google Cloud Console.
    pub client_secret: String,
}

impl OAuthCredentials {
    /// Creates new OAuth credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Returns true if either value is empty.
    pub fn is_incomplete(&self) -> bool {
        self.client_id.is_empty() || self.client_secret.is_empty()
    }
}

/// Configuration shared by the credential store and the contact service.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Path to the persisted token record.
    pub token_path: PathBuf,

    /// Refresh even when the stored access token has not expired.
    pub force_refresh: bool,

    /// Client credentials used when the token record has none.
    pub fallback_credentials: Option<OAuthCredentials>,

    /// OAuth token endpoint.
    pub token_url: String,

    /// People API base URL, without a trailing slash.
    pub people_api_url: String,

    /// Request timeout for both endpoints.
    pub timeout: Duration,

    /// User agent string for outgoing requests.
    pub user_agent: String,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default token file, relative to the working directory.
    pub const DEFAULT_TOKEN_PATH: &'static str = "token.json";

    /// Google's OAuth token endpoint.
    pub const TOKEN_URL: &'static str = "https://oauth2.googleapis.com/token";

    /// People API v1.
    pub const PEOPLE_API_URL: &'static str = "https://people.googleapis.com/v1";

    /// Creates a configuration reading tokens from `token_path`.
    pub fn new(token_path: impl Into<PathBuf>) -> Self {
        Self {
            token_path: token_path.into(),
            force_refresh: false,
            fallback_credentials: None,
            token_url: Self::TOKEN_URL.to_string(),
            people_api_url: Self::PEOPLE_API_URL.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("gcontacts/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets whether to refresh unconditionally.
    pub fn with_force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }

    /// Sets the fallback client credentials.
    pub fn with_fallback_credentials(mut self, credentials: OAuthCredentials) -> Self {
        self.fallback_credentials = Some(credentials);
        self
    }

    /// Sets the token endpoint URL.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Sets the People API base URL.
    pub fn with_people_api_url(mut self, url: impl Into<String>) -> Self {
        self.people_api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.token_path.as_os_str().is_empty() {
            return Err("token path is required".to_string());
        }
        for (name, url) in [
            ("token_url", &self.token_url),
            ("people_api_url", &self.people_api_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(format!("{} must be an http(s) URL, got {:?}", name, url));
            }
        }
        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOKEN_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = GoogleConfig::default();
        assert_eq!(config.token_path, PathBuf::from("token.json"));
        assert!(!config.force_refresh);
        assert!(config.fallback_credentials.is_none());
        assert_eq!(config.token_url, GoogleConfig::TOKEN_URL);
        assert_eq!(config.people_api_url, GoogleConfig::PEOPLE_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("gcontacts/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_methods() {
        let config = GoogleConfig::new("/tmp/tok.json")
            .with_force_refresh(true)
            .with_fallback_credentials(OAuthCredentials::new("id", "secret"))
            .with_token_url("http://127.0.0.1:9000/token")
            .with_people_api_url("http://127.0.0.1:9000/v1/")
            .with_timeout(Duration::from_secs(5));

        assert!(config.force_refresh);
        assert_eq!(
            config.fallback_credentials,
            Some(OAuthCredentials::new("id", "secret"))
        );
        assert_eq!(config.token_url, "http://127.0.0.1:9000/token");
        assert_eq!(config.people_api_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn config_validation() {
        assert!(GoogleConfig::new("").validate().is_err());
        assert!(
            GoogleConfig::default()
                .with_token_url("oauth2.googleapis.com/token")
                .validate()
                .is_err()
        );
        assert!(
            GoogleConfig::default()
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn incomplete_credentials() {
        assert!(OAuthCredentials::new("", "").is_incomplete());
        assert!(OAuthCredentials::new("id", "").is_incomplete());
        assert!(!OAuthCredentials::new("id", "secret").is_incomplete());
    }
}
