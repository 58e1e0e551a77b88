//! Error types for token handling and contact operations.
//!
//! Nothing in this crate retries. Every failure is returned to the caller
//! with a code that the CLI prints and the HTTP service maps to a status.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Token file missing or unreadable.
    FileAccess,
    /// Token file or API response is malformed, or a required field is absent.
    Parse,
    /// The token endpoint rejected the refresh request.
    AuthRefreshFailed,
    /// The People API rejected the access token (401).
    AuthenticationFailed,
    /// The People API returned a non-success status.
    Api,
    /// The targeted contact does not exist (404).
    NotFound,
    /// Connection failed, timed out, or the body could not be read.
    NetworkError,
    /// Missing or invalid configuration.
    ConfigurationError,
    /// Unexpected local failure.
    InternalError,
}

impl ProviderErrorCode {
    /// Returns a stable snake_case name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileAccess => "file_access",
            Self::Parse => "parse_error",
            Self::AuthRefreshFailed => "auth_refresh_failed",
            Self::AuthenticationFailed => "authentication_failed",
            Self::Api => "api_error",
            Self::NotFound => "not_found",
            Self::NetworkError => "network_error",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error from the token store, the token endpoint or the People API.
#[derive(Debug, Error)]
pub struct ProviderError {
    /// The error code categorizing this error.
    code: ProviderErrorCode,
    /// A human-readable message. For API errors this is the response body.
    message: String,
    /// HTTP status returned by the remote service, if any.
    status: Option<u16>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates a file access error.
    pub fn file_access(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::FileAccess, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Parse, message)
    }

    /// Creates a token refresh error carrying the endpoint's status.
    pub fn auth_refresh(status: u16, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthRefreshFailed, message).with_status(status)
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message).with_status(401)
    }

    /// Creates an API error from a status code and response body.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Api, body).with_status(status)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message).with_status(404)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Sets the HTTP status for this error.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the remote HTTP status, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns true if the targeted contact does not exist.
    pub fn is_not_found(&self) -> bool {
        self.code == ProviderErrorCode::NotFound
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({}): {}", self.code, status, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
