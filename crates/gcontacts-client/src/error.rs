//! Client error types.

use std::fmt;

use gcontacts_core::{ResourceNameError, TracingError};
use gcontacts_providers::ProviderError;
use gcontacts_server::ServerError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Bad command-line input.
    Usage(String),
    /// Token or People API failure.
    Provider(ProviderError),
    /// HTTP service failed to start or stopped with an error.
    Server(ServerError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Usage(msg) => write!(f, "{}", msg),
            Self::Provider(err) => write!(f, "{}", err),
            Self::Server(err) => write!(f, "server error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::Server(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<ServerError> for ClientError {
    fn from(err: ServerError) -> Self {
        Self::Server(err)
    }
}

impl From<ResourceNameError> for ClientError {
    fn from(err: ResourceNameError) -> Self {
        Self::Usage(err.to_string())
    }
}

impl From<TracingError> for ClientError {
    fn from(err: TracingError) -> Self {
        Self::Config(err.to_string())
    }
}
