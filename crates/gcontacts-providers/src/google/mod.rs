//! Google token handling and People API contact operations.
//!
//! # Token lifecycle
//!
//! 1. [`CredentialStore`] reads the token record from disk
//! 2. If `expireTime` is past (or null), or a refresh is forced, it posts a
//!    refresh-token grant to the token endpoint
//! 3. The rotated record is written back atomically, keeping the stored
//!    client id and secret and any unknown keys
//! 4. The access token is handed to [`ContactService`]
//!
//! A failed refresh leaves the token file untouched.
//!
//! # Example
//!
//! ```ignore
//! use gcontacts_core::{ContactFields, ResourceName};
//! use gcontacts_providers::google::{ContactService, CredentialStore, GoogleConfig};
//!
//! let config = GoogleConfig::new("token.json").with_force_refresh(true);
//! let credential = CredentialStore::from_config(&config)?.load_and_refresh().await?;
//! let contacts = ContactService::new(&credential, &config)?;
//!
//! let name = ResourceName::parse("people/c123")?;
//! contacts
//!     .edit(&name, &ContactFields::new("Ada", "Lovelace").with_mobile(["+44 1234"]))
//!     .await?;
//! ```

mod client;
mod config;
mod contacts;
mod credentials;
mod oauth;
mod person;
mod tokens;

pub use client::PeopleClient;
pub use config::{GoogleConfig, OAuthCredentials};
pub use contacts::ContactService;
pub use credentials::{AccessCredential, CredentialStore, refresh_record};
pub use oauth::{BoxFuture, OAuthClient, RefreshRequest, TokenEndpoint, TokenGrant};
pub use person::{FieldValue, Name, Organization, PERSON_FIELDS, Person};
pub use tokens::{TokenRecord, TokenStorage};
