//! Contact commands: create, edit, delete.
//!
//! Each run loads the token file, refreshes it if needed, performs one
//! People API operation and prints the outcome.

use tracing::debug;

use gcontacts_core::{ContactFields, ResourceName};
use gcontacts_providers::google::{ContactService, CredentialStore, GoogleConfig};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Builds the provider config and a contact service with a fresh token.
async fn connect(config: &ClientConfig) -> ClientResult<ContactService> {
    let google = google_config(config)?;
    let credential = CredentialStore::from_config(&google)?
        .load_and_refresh()
        .await?;
    debug!(refreshed = credential.refreshed, "access token ready");
    Ok(ContactService::new(&credential, &google)?)
}

pub(crate) fn google_config(config: &ClientConfig) -> ClientResult<GoogleConfig> {
    config.google.to_provider_config().map_err(ClientError::Config)
}

/// Creates a contact and prints its id.
pub async fn create(config: &ClientConfig, fields: ContactFields) -> ClientResult<()> {
    let contacts = connect(config).await?;
    let name = contacts.create(&fields).await?;
    println!("Created contact {}", name.id());
    Ok(())
}

/// Overwrites a contact.
pub async fn edit(config: &ClientConfig, resource_name: &str, fields: ContactFields) -> ClientResult<()> {
    let name = ResourceName::parse(resource_name)?;
    let contacts = connect(config).await?;
    let updated = contacts.edit(&name, &fields).await?;
    println!(
        "Updated contact {} ({} phone number{})",
        name.id(),
        updated.phone_numbers.len(),
        if updated.phone_numbers.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

/// Deletes a contact.
pub async fn delete(config: &ClientConfig, resource_name: &str) -> ClientResult<()> {
    let name = ResourceName::parse(resource_name)?;
    let contacts = connect(config).await?;
    contacts.delete(&name).await?;
    println!("Deleted contact {}", name.id());
    Ok(())
}
