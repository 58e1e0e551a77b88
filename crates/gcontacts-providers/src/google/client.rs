//! Google People API client.
//!
//! A thin HTTP layer: one method per endpoint, bearer authentication, and
//! status-to-error mapping. No retries.

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use gcontacts_core::ResourceName;

use crate::error::{ProviderError, ProviderResult};

use super::person::Person;

/// People API client bound to one access token.
#[derive(Debug, Clone)]
pub struct PeopleClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl PeopleClient {
    /// Creates a client for `base_url` (e.g. `https://people.googleapis.com/v1`).
    pub fn new(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
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
            http_client,
            access_token: access_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `POST people:createContact`.
    pub async fn create_contact(&self, person: &Person) -> ProviderResult<Person> {
        let url = format!("{}/people:createContact", self.base_url);
        let request = self.http_client.post(&url).json(person);
        let body = self.send(request, None).await?;
        parse_body(&body)
    }

    /// `GET {resource}?personFields=...`.
    pub async fn get_contact(
        &self,
        resource: &ResourceName,
        person_fields: &str,
    ) -> ProviderResult<Person> {
        let url = format!("{}/{}", self.base_url, resource);
        let request = self
            .http_client
            .get(&url)
            .query(&[("personFields", person_fields)]);
        let body = self.send(request, Some(resource)).await?;
        parse_body(&body)
    }

    /// `PATCH {resource}:updateContact?updatePersonFields=...`.
    pub async fn update_contact(
        &self,
        resource: &ResourceName,
        person: &Person,
        update_person_fields: &str,
    ) -> ProviderResult<Person> {
        let url = format!("{}/{}:updateContact", self.base_url, resource);
        let request = self
            .http_client
            .patch(&url)
            .query(&[("updatePersonFields", update_person_fields)])
            .json(person);
        let body = self.send(request, Some(resource)).await?;
        parse_body(&body)
    }

    /// `DELETE {resource}:deleteContact`.
    pub async fn delete_contact(&self, resource: &ResourceName) -> ProviderResult<()> {
        let url = format!("{}/{}:deleteContact", self.base_url, resource);
        let request = self.http_client.delete(&url);
        self.send(request, Some(resource)).await?;
        Ok(())
    }

    /// Sends an authenticated request and returns the body of a 2xx response.
    async fn send(
        &self,
        request: RequestBuilder,
        resource: Option<&ResourceName>,
    ) -> ProviderResult<String> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    format!("request failed: {}", e)
                };
                ProviderError::network(message).with_source(e)
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "people api response");

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if status.is_success() {
            return Ok(body);
        }

        match (status, resource) {
            (StatusCode::NOT_FOUND, Some(resource)) => Err(ProviderError::not_found(format!(
                "contact {} not found",
                resource
            ))),
            (StatusCode::UNAUTHORIZED, _) => Err(ProviderError::authentication(
                "access token expired or invalid",
            )),
            _ => Err(ProviderError::api(status.as_u16(), body)),
        }
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> ProviderResult<T> {
    serde_json::from_str(body).map_err(|e| {
        ProviderError::parse(format!("failed to parse response: {}", e)).with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = PeopleClient::new(
            "token",
            "http://127.0.0.1:1/v1/",
            Duration::from_secs(1),
            "gcontacts-test",
        )
        .unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:1/v1");
    }

    #[test]
    fn parse_create_response() {
        let body = r#"{
            "resourceName": "people/c7283467",
            "etag": "%EgcBAgkuNz0+GgQBAgUHIgxHWk",
            "names": [{"givenName": "A", "familyName": "B", "displayName": "A B"}]
        }"#;
        let person: Person = parse_body(body).unwrap();
        assert_eq!(person.resource_name.as_deref(), Some("people/c7283467"));
        assert_eq!(person.names[0].other["displayName"], "A B");
    }

    #[test]
    fn parse_garbage_is_parse_error() {
        let err = parse_body::<Person>("<html>").unwrap_err();
        assert_eq!(err.code(), crate::error::ProviderErrorCode::Parse);
    }
}
