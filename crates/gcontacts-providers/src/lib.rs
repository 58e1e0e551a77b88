//! Token management and contact operations against Google's People API.
//!
//! - [`google::CredentialStore`] loads the persisted token record, refreshes
//!   it when stale and writes the rotated token back
//! - [`google::ContactService`] creates, edits and deletes contacts with the
//!   resulting access token
//! - [`ProviderError`] is the error type for both
//!
//! ```ignore
//! use gcontacts_core::ContactFields;
//! use gcontacts_providers::google::{ContactService, CredentialStore, GoogleConfig};
//!
//! let config = GoogleConfig::new("token.json");
//! let credential = CredentialStore::from_config(&config)?.load_and_refresh().await?;
//! let contacts = ContactService::new(&credential, &config)?;
//! let name = contacts.create(&ContactFields::new("Ada", "Lovelace")).await?;
//! ```

pub mod error;
pub mod google;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
