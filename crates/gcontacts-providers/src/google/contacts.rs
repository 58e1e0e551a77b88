//! Contact operations: create, edit, delete.

use tracing::{info, instrument};

use gcontacts_core::{ContactFields, ResourceName};

use crate::error::{ProviderError, ProviderResult};

use super::client::PeopleClient;
use super::config::GoogleConfig;
use super::credentials::AccessCredential;
use super::person::{PERSON_FIELDS, Person};

/// Contact operations for one access token.
#[derive(Debug, Clone)]
pub struct ContactService {
    client: PeopleClient,
}

impl ContactService {
    /// Creates a service calling the configured People API with `credential`.
    pub fn new(credential: &AccessCredential, config: &GoogleConfig) -> ProviderResult<Self> {
        let client = PeopleClient::new(
            &credential.access_token,
            &config.people_api_url,
            config.timeout,
            &config.user_agent,
        )?;
        Ok(Self::with_client(client))
    }

    /// Wraps an existing client.
    pub fn with_client(client: PeopleClient) -> Self {
        Self { client }
    }

    /// Creates a contact and returns its resource name.
    #[instrument(skip_all, fields(first_name = %fields.first_name, last_name = %fields.last_name))]
    pub async fn create(&self, fields: &ContactFields) -> ProviderResult<ResourceName> {
        let created = self.client.create_contact(&Person::from_fields(fields)).await?;

        let raw = created
            .resource_name
            .ok_or_else(|| ProviderError::parse("createContact response has no resourceName"))?;
        let name = ResourceName::parse(&raw).map_err(|e| {
            ProviderError::parse(format!("invalid resourceName {:?}: {}", raw, e)).with_source(e)
        })?;

        info!(resource_name = %name, "created contact");
        Ok(name)
    }

    /// Overwrites a contact with `fields` and returns the updated contact.
    ///
    /// Fetches the current record first so the update carries its `etag`.
    /// The phone list is replaced with `fields.mobile`; unsupplied optional
    /// fields keep their stored values. Nothing is sent if the fetch fails.
    #[instrument(skip_all, fields(resource_name = %name))]
    pub async fn edit(&self, name: &ResourceName, fields: &ContactFields) -> ProviderResult<Person> {
        let mut person = self.client.get_contact(name, PERSON_FIELDS).await?;
        person.apply_fields(fields);

        let updated = self
            .client
            .update_contact(name, &person, PERSON_FIELDS)
            .await?;

        info!(phones = updated.phone_numbers.len(), "updated contact");
        Ok(updated)
    }

    /// Deletes a contact.
    #[instrument(skip_all, fields(resource_name = %name))]
    pub async fn delete(&self, name: &ResourceName) -> ProviderResult<()> {
        self.client.delete_contact(name).await?;
        info!("deleted contact");
        Ok(())
    }
}
