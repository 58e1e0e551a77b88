//! Credential store: load the token record, refresh it when stale.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

use super::config::{GoogleConfig, OAuthCredentials};
use super::oauth::{OAuthClient, RefreshRequest, TokenEndpoint};
use super::tokens::{TokenRecord, TokenStorage};

/// A usable access token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCredential {
    /// Bearer token for API calls.
    pub access_token: String,
    /// When the token stops being valid.
    pub expires_at: DateTime<Utc>,
    /// Whether this call had to refresh the token.
    pub refreshed: bool,
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("refreshed", &self.refreshed)
            .finish()
    }
}

/// Loads the persisted token record and keeps it fresh.
pub struct CredentialStore {
    storage: TokenStorage,
    endpoint: Box<dyn TokenEndpoint>,
    force_refresh: bool,
    fallback_credentials: Option<OAuthCredentials>,
}

impl CredentialStore {
    /// Creates a store over `storage` refreshing through `endpoint`.
    pub fn new(storage: TokenStorage, endpoint: Box<dyn TokenEndpoint>) -> Self {
        Self {
            storage,
            endpoint,
            force_refresh: false,
            fallback_credentials: None,
        }
    }

    /// Creates a store talking to the configured token endpoint.
    pub fn from_config(config: &GoogleConfig) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;

        let endpoint = OAuthClient::new(&config.token_url, config.timeout, &config.user_agent)?;
        let mut store = Self::new(TokenStorage::new(&config.token_path), Box::new(endpoint))
            .with_force_refresh(config.force_refresh);
        if let Some(ref credentials) = config.fallback_credentials {
            store = store.with_fallback_credentials(credentials.clone());
        }
        Ok(store)
    }

    /// Refresh on every load, even when the token is still valid.
    pub fn with_force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }

    /// Client credentials used when the record's own are empty.
    pub fn with_fallback_credentials(mut self, credentials: OAuthCredentials) -> Self {
        self.fallback_credentials = Some(credentials);
        self
    }

    /// Returns the token file path.
    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// Returns a valid access token, refreshing and persisting it if needed.
    pub async fn load_and_refresh(&self) -> ProviderResult<AccessCredential> {
        self.load_and_refresh_at(Utc::now()).await
    }

    /// Same as [`load_and_refresh`](Self::load_and_refresh) with an explicit clock.
    pub async fn load_and_refresh_at(&self, now: DateTime<Utc>) -> ProviderResult<AccessCredential> {
        let record = self.storage.load()?;

        if !self.force_refresh && !record.is_expired(now) {
            debug!(expires_at = %record.effective_expiry(now), "stored access token still valid");
            return Ok(AccessCredential {
                expires_at: record.effective_expiry(now),
                access_token: record.access_token,
                refreshed: false,
            });
        }

        if self.force_refresh {
            info!("forced refresh of access token");
        } else {
            info!(expired_at = %record.effective_expiry(now), "access token expired, refreshing");
        }

        let refreshed = self.refresh(&record, now).await?;
        self.storage.save(&refreshed)?;

        Ok(AccessCredential {
            expires_at: refreshed.effective_expiry(now),
            access_token: refreshed.access_token,
            refreshed: true,
        })
    }

    /// Exchanges the record's refresh token and returns the updated record.
    ///
    /// Does not touch the file.
    pub async fn refresh(&self, record: &TokenRecord, now: DateTime<Utc>) -> ProviderResult<TokenRecord> {
        let credentials = self.client_credentials(record);
        refresh_record(self.endpoint.as_ref(), record, &credentials, now).await
    }

    /// The record's client credentials, or the fallback when they are empty.
    fn client_credentials(&self, record: &TokenRecord) -> OAuthCredentials {
        let own = record.credentials();
        match self.fallback_credentials {
            Some(ref fallback) if own.is_incomplete() => fallback.clone(),
            _ => own,
        }
    }
}

/// Runs one refresh-token grant for `record` and returns the rotated record.
pub async fn refresh_record(
    endpoint: &dyn TokenEndpoint,
    record: &TokenRecord,
    credentials: &OAuthCredentials,
    now: DateTime<Utc>,
) -> ProviderResult<TokenRecord> {
    if record.refresh_token.is_empty() {
        return Err(ProviderError::parse("token file has an empty refresh_token"));
    }

    let request = RefreshRequest::new(credentials, &record.refresh_token);
    let grant = endpoint.refresh(request).await?;
    record.refreshed(grant, now)
}
