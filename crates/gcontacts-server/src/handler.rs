//! Route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use gcontacts_core::{ContactFields, ResourceName};
use gcontacts_providers::google::{ContactService, CredentialStore, GoogleConfig};

use crate::error::{ApiError, ServerError, ServerResult};

/// Shared state for all routes.
///
/// The credential store is behind an async mutex so two requests never
/// refresh and rewrite the token file at the same time.
#[derive(Clone)]
pub struct AppState {
    credentials: Arc<Mutex<CredentialStore>>,
    google: Arc<GoogleConfig>,
}

impl AppState {
    /// Creates the state from a credential store and the People API settings.
    pub fn new(credentials: CredentialStore, google: GoogleConfig) -> Self {
        Self {
            credentials: Arc::new(Mutex::new(credentials)),
            google: Arc::new(google),
        }
    }

    /// Builds the state straight from configuration.
    pub fn from_config(google: GoogleConfig) -> ServerResult<Self> {
        let credentials =
            CredentialStore::from_config(&google).map_err(|e| ServerError::config(e.to_string()))?;
        Ok(Self::new(credentials, google))
    }

    /// Returns a contact service with a fresh access token.
    async fn contacts(&self) -> Result<ContactService, ApiError> {
        let credential = {
            let store = self.credentials.lock().await;
            store.load_and_refresh().await?
        };
        debug!(refreshed = credential.refreshed, "access token ready");
        Ok(ContactService::new(&credential, &self.google)?)
    }
}

/// Contact fields as sent by HTTP clients.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub mobile_list: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl From<ContactRequest> for ContactFields {
    fn from(request: ContactRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            company: request.company,
            mobile: request.mobile_list,
            email: request.email,
            note: request.note,
        }
    }
}

/// Body of `PUT /edit`.
#[derive(Debug, Clone, Deserialize)]
pub struct EditRequest {
    pub resource_name: String,
    #[serde(flatten)]
    pub contact: ContactRequest,
}

/// Body of `DELETE /delete`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRequest {
    pub resource_name: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub resource_name: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Liveness check.
pub async fn test() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "API is working!",
    })
}

/// Creates a contact.
#[instrument(skip_all, err)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<CreateResponse>, ApiError> {
    let contacts = state.contacts().await?;
    let name = contacts.create(&request.into()).await?;
    Ok(Json(CreateResponse {
        resource_name: name.into(),
    }))
}

/// Overwrites a contact.
#[instrument(skip_all, fields(resource_name = %request.resource_name), err)]
pub async fn edit(
    State(state): State<AppState>,
    Json(request): Json<EditRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let name = ResourceName::parse(&request.resource_name)?;
    let contacts = state.contacts().await?;
    contacts.edit(&name, &request.contact.into()).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Deletes a contact.
#[instrument(skip_all, fields(resource_name = %request.resource_name), err)]
pub async fn delete(
    State(state): State<AppState>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let name = ResourceName::parse(&request.resource_name)?;
    let contacts = state.contacts().await?;
    contacts.delete(&name).await?;
    Ok(Json(SuccessResponse { success: true }))
}
