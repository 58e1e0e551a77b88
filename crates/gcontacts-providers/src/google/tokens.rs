//! Persisted OAuth token record.
//!
//! The token file is a flat JSON object:
//!
//! ```json
//! {
//!   "access_token": "ya29...",
//!   "refresh_token": "1//0g...",
//!   "expires_in": 3599,
//!   "token_type": "Bearer",
//!   "scope": "https://www.googleapis.com/auth/contacts",
//!   "expireTime": "2024-03-15T10:00:00.000000+00:00",
//!   "client_id": "",
//!   "client_secret": ""
//! }
//! ```
//!
//! `expireTime` may be null, in which case the token counts as expired. The
//! file is shared between invocations without locking; the last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

use super::config::OAuthCredentials;
use super::oauth::TokenGrant;

/// Safety margin applied when the record has no expiry.
const MISSING_EXPIRY_MARGIN_SECS: i64 = 10;

/// The persisted token record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// The access token for API requests.
    pub access_token: String,

    /// The refresh token for obtaining new access tokens.
    pub refresh_token: String,

    /// Access token lifetime in seconds.
    #[serde(deserialize_with = "lifetime::deserialize")]
    pub expires_in: i64,

    /// Token type, always `Bearer` for Google.
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// The granted OAuth scope.
    pub scope: String,

    /// Absolute expiry of the access token.
    #[serde(rename = "expireTime", default, with = "expire_time")]
    pub expire_time: Option<DateTime<Utc>>,

    /// OAuth client ID, may be empty.
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret, may be empty.
    #[serde(default)]
    pub client_secret: String,

    /// Keys this tool does not know about, kept on rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenRecord {
    /// Parses a record from the token file contents.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ProviderError::parse(format!("invalid token file: {}", e)).with_source(e))
    }

    /// The expiry used for staleness checks.
    ///
    /// A record without `expireTime` expired ten seconds ago.
    pub fn effective_expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.expire_time.unwrap_or_else(|| {
            now.checked_sub_signed(Duration::seconds(MISSING_EXPIRY_MARGIN_SECS))
                .unwrap_or(now)
        })
    }

    /// Returns true if the access token is expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.effective_expiry(now) <= now
    }

    /// Client credentials stored in the record.
    pub fn credentials(&self) -> OAuthCredentials {
        OAuthCredentials::new(&self.client_id, &self.client_secret)
    }

    /// Returns the record after a successful refresh at `now`.
    ///
    /// The new expiry is `now + lifetime`. A lifetime, refresh token or scope
    /// in the grant replaces the stored one. Client id and secret are kept.
    /// A lifetime that does not fit a timestamp is a parse error.
    pub fn refreshed(&self, grant: TokenGrant, now: DateTime<Utc>) -> ProviderResult<Self> {
        let expires_in = grant.expires_in.unwrap_or(self.expires_in);
        let expire_time = Duration::try_seconds(expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                ProviderError::parse(format!("expires_in {} is out of range", expires_in))
            })?;
        Ok(Self {
            access_token: grant.access_token,
            refresh_token: grant
                .refresh_token
                .unwrap_or_else(|| self.refresh_token.clone()),
            expires_in,
            token_type: grant
                .token_type
                .unwrap_or_else(|| self.token_type.clone()),
            scope: grant.scope.unwrap_or_else(|| self.scope.clone()),
            expire_time: Some(expire_time),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            extra: self.extra.clone(),
        })
    }
}

/// `expires_in` written by other tools is sometimes a string.
mod lifetime {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = match Raw::deserialize(deserializer)? {
            Raw::Int(secs) => secs,
            Raw::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| de::Error::custom(format!("invalid expires_in {:?}", text)))?,
        };
        if Duration::try_seconds(secs).is_none() {
            return Err(de::Error::custom(format!("expires_in {} is out of range", secs)));
        }
        Ok(secs)
    }
}

/// `expireTime` is RFC 3339, or a naive ISO-8601 datetime taken as UTC.
mod expire_time {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => {
                serializer.serialize_some(&time.to_rfc3339_opts(SecondsFormat::Micros, false))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse(text)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid expireTime {:?}", text))),
        }
    }

    pub fn parse(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(time) = DateTime::parse_from_rfc3339(text) {
            return Some(time.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// File-backed storage for the token record.
#[derive(Debug, Clone)]
pub struct TokenStorage {
    /// Path to the token file.
    path: PathBuf,
}

impl TokenStorage {
    /// Creates a storage for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the token file.
    pub fn load(&self) -> ProviderResult<TokenRecord> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::file_access(format!(
                "failed to read token file {}: {}",
                self.path.display(),
                e
            ))
            .with_source(e)
        })?;

        let record = TokenRecord::from_json(&content)?;
        debug!(path = %self.path.display(), "loaded token record");
        Ok(record)
    }

    /// Replaces the token file with `record`.
    ///
    /// Writes a sibling temp file and renames it over the original.
    pub fn save(&self, record: &TokenRecord) -> ProviderResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                ProviderError::file_access(format!("failed to create token directory: {}", e))
                    .with_source(e)
            })?;
        }

        let content = serde_json::to_string_pretty(record)
            .map_err(|e| ProviderError::internal(format!("failed to serialize tokens: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        write_private(&temp_path, content.as_bytes()).map_err(|e| {
            ProviderError::file_access(format!("failed to write token file: {}", e))
                .with_source(e)
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            ProviderError::file_access(format!("failed to replace token file: {}", e))
                .with_source(e)
        })?;

        info!(path = %self.path.display(), "saved refreshed token record");
        Ok(())
    }
}

/// Writes `content` to a new file readable only by the owner.
///
/// A leftover file at `path` is removed first so its mode is not reused.
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(content)?;
    file.sync_all()
}
