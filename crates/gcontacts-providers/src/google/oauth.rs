//! OAuth 2.0 refresh-token grant.
//!
//! [`TokenEndpoint`] is the seam between the credential store and the
//! network: [`OAuthClient`] talks to Google, tests plug in a fake.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

use super::config::OAuthCredentials;

/// A boxed future, so the endpoint can be used as a trait object.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Parameters of a refresh-token grant.
#[derive(Debug, Clone, Copy)]
pub struct RefreshRequest<'a> {
    /// OAuth client ID.
    pub client_id: &'a str,
    /// OAuth client secret.
    pub client_secret: &'a str,
    /// The long-lived refresh token.
    pub refresh_token: &'a str,
}

impl<'a> RefreshRequest<'a> {
    /// Builds a request from client credentials and a refresh token.
    pub fn new(credentials: &'a OAuthCredentials, refresh_token: &'a str) -> Self {
        Self {
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
            refresh_token,
        }
    }
}

/// Successful response from the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    /// The new access token.
    pub access_token: String,
    /// Lifetime of the new access token in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Present only when the server rotates the refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Granted scope, space separated.
    #[serde(default)]
    pub scope: Option<String>,
    /// Token type.
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Something that can exchange a refresh token for an access token.
pub trait TokenEndpoint: Send + Sync {
    /// Performs one refresh-token grant. Never retries.
    fn refresh<'a>(&'a self, request: RefreshRequest<'a>) -> BoxFuture<'a, ProviderResult<TokenGrant>>;
}

/// Token endpoint client over HTTP.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    token_url: String,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a client posting to `token_url`.
    pub fn new(
        token_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            token_url: token_url.into(),
            http_client,
        })
    }

    /// Returns the token endpoint URL.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    async fn refresh_impl(&self, request: RefreshRequest<'_>) -> ProviderResult<TokenGrant> {
        let params = [
            ("client_id", request.client_id),
            ("client_secret", request.client_secret),
            ("refresh_token", request.refresh_token),
            ("grant_type", "refresh_token"),
        ];

        debug!(url = %self.token_url, "requesting access token refresh");

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                ProviderError::network(format!("token refresh request failed: {}", e))
                    .with_source(e)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::auth_refresh(
                status.as_u16(),
                format!("token refresh failed: {}", body),
            ));
        }

        let grant: TokenGrant = serde_json::from_str(&body).map_err(|e| {
            ProviderError::parse(format!("invalid token response: {}", e)).with_source(e)
        })?;

        info!(expires_in = ?grant.expires_in, "refreshed access token");
        Ok(grant)
    }
}

impl TokenEndpoint for OAuthClient {
    fn refresh<'a>(&'a self, request: RefreshRequest<'a>) -> BoxFuture<'a, ProviderResult<TokenGrant>> {
        Box::pin(self.refresh_impl(request))
    }
}
