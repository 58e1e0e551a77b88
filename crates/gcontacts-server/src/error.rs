//! Server error types.

use std::io;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use gcontacts_core::ResourceNameError;
use gcontacts_providers::{ProviderError, ProviderErrorCode};

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Bind or accept failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Error returned by route handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Token or People API failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// `resource_name` in the request body is not a person resource.
    #[error(transparent)]
    InvalidResourceName(#[from] ResourceNameError),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidResourceName(_) => StatusCode::BAD_REQUEST,
            Self::Provider(e) => match e.code() {
                ProviderErrorCode::NotFound => StatusCode::NOT_FOUND,
                ProviderErrorCode::AuthRefreshFailed
                | ProviderErrorCode::AuthenticationFailed => StatusCode::UNAUTHORIZED,
                ProviderErrorCode::Api => StatusCode::BAD_GATEWAY,
                ProviderErrorCode::NetworkError => StatusCode::SERVICE_UNAVAILABLE,
                ProviderErrorCode::FileAccess
                | ProviderErrorCode::Parse
                | ProviderErrorCode::ConfigurationError
                | ProviderErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
