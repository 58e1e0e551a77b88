//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/gcontacts/config.toml` by default. Every section is optional.
//!
//! ```toml
//! debug = false
//!
//! [google]
//! token_path = "./token.json"
//! force_refresh = false
//! client_id = "env::GOOGLE_CLIENT_ID"
//! client_secret = "pass::google/contacts-secret"
//! timeout = 30
//!
//! [server]
//! bind = "0.0.0.0:5000"
//! route_prefix = ""
//! ```
//!
//! `client_id` and `client_secret` are only used when the token file has
//! empty client fields, and support secret references (see [`crate::secret`]).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use gcontacts_providers::google::{GoogleConfig, OAuthCredentials};
use gcontacts_server::ServerConfig;

use crate::cli::Cli;

/// Configuration for the gcontacts client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Token and People API settings.
    pub google: GoogleSettings,

    /// HTTP service settings.
    pub server: ServerSettings,
}

/// `[google]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// Path to the token file. Defaults to `./token.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,

    /// Refresh on every run.
    pub force_refresh: bool,

    /// Fallback OAuth client ID (supports `pass::` and `env::` prefixes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Fallback OAuth client secret (supports `pass::` and `env::` prefixes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// HTTP timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Token endpoint override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,

    /// People API base URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people_api_url: Option<String>,
}

/// `[server]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Listen address, `0.0.0.0:5000` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    /// Path the routes are mounted under.
    pub route_prefix: String,
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it is absent.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    /// Parses `config.toml` contents.
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gcontacts")
    }

    /// Applies global command-line flags on top of the file values.
    ///
    /// `--token-path` already includes `GCONTACTS_TOKEN_PATH` through clap.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.debug {
            self.debug = true;
        }
        if let Some(ref path) = cli.token_path {
            self.google.token_path = Some(path.clone());
        }
        if cli.force_refresh {
            self.google.force_refresh = true;
        }
        if let Some(timeout) = cli.timeout {
            self.google.timeout = Some(timeout);
        }
    }
}

impl GoogleSettings {
    /// Builds the provider configuration, resolving secret references.
    pub fn to_provider_config(&self) -> Result<GoogleConfig, String> {
        let token_path = self
            .token_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(GoogleConfig::DEFAULT_TOKEN_PATH));

        let mut config = GoogleConfig::new(token_path).with_force_refresh(self.force_refresh);

        if let Some(credentials) = self.resolve_credentials()? {
            config = config.with_fallback_credentials(credentials);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        if let Some(ref url) = self.token_url {
            config = config.with_token_url(url);
        }
        if let Some(ref url) = self.people_api_url {
            config = config.with_people_api_url(url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolves the fallback client credentials.
    ///
    /// Neither set is fine; only one set is an error.
    pub fn resolve_credentials(&self) -> Result<Option<OAuthCredentials>, String> {
        let (raw_id, raw_secret) = match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (None, None) => return Ok(None),
            (Some(id), Some(secret)) => (id, secret),
            (Some(_), None) => {
                return Err("client_secret is missing from [google] section in config.toml".into());
            }
            (None, Some(_)) => {
                return Err("client_id is missing from [google] section in config.toml".into());
            }
        };

        let client_id = crate::secret::resolve(raw_id)
            .map_err(|e| format!("failed to resolve client_id: {}", e))?;
        let client_secret = crate::secret::resolve(raw_secret)
            .map_err(|e| format!("failed to resolve client_secret: {}", e))?;

        Ok(Some(OAuthCredentials::new(client_id, client_secret)))
    }
}

impl ServerSettings {
    /// Builds the HTTP service configuration.
    pub fn to_server_config(&self) -> Result<ServerConfig, String> {
        let mut config = ServerConfig::default();
        if let Some(ref bind) = self.bind {
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| format!("invalid bind address {:?}: {}", bind, e))?;
            config = ServerConfig::new(addr);
        }
        Ok(config.with_route_prefix(&self.route_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ClientConfig::parse("").unwrap();
        assert_eq!(config, ClientConfig::default());

        let google = config.google.to_provider_config().unwrap();
        assert_eq!(google.token_path, PathBuf::from("token.json"));
        assert!(!google.force_refresh);
        assert!(google.fallback_credentials.is_none());

        let server = config.server.to_server_config().unwrap();
        assert_eq!(server.bind.to_string(), "0.0.0.0:5000");
        assert_eq!(server.route_prefix, "");
    }

    #[test]
    fn full_file_round_trips_into_provider_config() {
        let config = ClientConfig::parse(
            r#"
debug = true

[google]
token_path = "/var/lib/gcontacts/token.json"
force_refresh = true
client_id = "id.apps.googleusercontent.com"
client_secret = "secret"
timeout = 10
people_api_url = "http://127.0.0.1:9000/v1/"

[server]
bind = "127.0.0.1:8080"
route_prefix = "raman"
"#,
        )
        .unwrap();
        assert!(config.debug);

        let google = config.google.to_provider_config().unwrap();
        assert_eq!(google.token_path, PathBuf::from("/var/lib/gcontacts/token.json"));
        assert!(google.force_refresh);
        assert_eq!(
            google.fallback_credentials,
            Some(OAuthCredentials::new("id.apps.googleusercontent.com", "secret"))
        );
        assert_eq!(google.timeout, Duration::from_secs(10));
        assert_eq!(google.people_api_url, "http://127.0.0.1:9000/v1");
        assert_eq!(google.token_url, GoogleConfig::TOKEN_URL);

        let server = config.server.to_server_config().unwrap();
        assert_eq!(server.bind.port(), 8080);
        assert_eq!(server.route_prefix, "/raman");
    }

    #[test]
    fn env_reference_in_credentials() {
        unsafe {
            std::env::set_var("_GC_CFG_TEST_ID", "env-id");
            std::env::set_var("_GC_CFG_TEST_SECRET", "env-secret");
        }
        let config = ClientConfig::parse(
            r#"
[google]
client_id = "env::_GC_CFG_TEST_ID"
client_secret = "env::_GC_CFG_TEST_SECRET"
"#,
        )
        .unwrap();
        let credentials = config.google.resolve_credentials().unwrap().unwrap();
        assert_eq!(credentials, OAuthCredentials::new("env-id", "env-secret"));
        unsafe {
            std::env::remove_var("_GC_CFG_TEST_ID");
            std::env::remove_var("_GC_CFG_TEST_SECRET");
        }
    }

    #[test]
    fn half_configured_credentials_error() {
        let settings = GoogleSettings {
            client_id: Some("id".to_string()),
            ..Default::default()
        };
        let err = settings.resolve_credentials().unwrap_err();
        assert!(err.contains("client_secret"));
    }

    #[test]
    fn invalid_bind_errors() {
        let settings = ServerSettings {
            bind: Some("not-an-addr".to_string()),
            ..Default::default()
        };
        assert!(settings.to_server_config().is_err());
    }

    #[test]
    fn bad_types_are_reported() {
        assert!(ClientConfig::parse("[google]\ntimeout = \"soon\"\n").is_err());
    }

    #[test]
    fn cli_flags_override_file() {
        let mut config = ClientConfig::parse(
            r#"
[google]
token_path = "/from/file.json"
timeout = 10
"#,
        )
        .unwrap();
        let cli = Cli::try_parse_from([
            "gcontacts",
            "--token-path",
            "/from/flag.json",
            "--timeout",
            "3",
            "--force-refresh",
            "token",
        ])
        .unwrap();
        config.apply_cli(&cli);

        assert_eq!(config.google.token_path, Some(PathBuf::from("/from/flag.json")));
        assert_eq!(config.google.timeout, Some(3));
        assert!(config.google.force_refresh);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nroute_prefix = \"/api\"\n").unwrap();
        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.server.route_prefix, "/api");

        assert!(ClientConfig::load_from(&dir.path().join("missing.toml")).is_err());
    }
}
