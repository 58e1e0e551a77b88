//! Contact input fields and People API resource names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of every person resource name.
pub const PEOPLE_PREFIX: &str = "people/";

/// The fields a caller supplies when creating or editing a contact.
///
/// Optional fields that are `None` are left alone on edit. Empty strings are
/// treated the same as `None` when building a new contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Organization name.
    #[serde(default)]
    pub company: Option<String>,
    /// Phone numbers, in order. On edit this list replaces the stored one.
    #[serde(default)]
    pub mobile: Vec<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-text note (stored as the contact biography).
    #[serde(default)]
    pub note: Option<String>,
}

impl ContactFields {
    /// Creates fields with just a name.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }

    /// Sets the organization name.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Replaces the phone numbers.
    pub fn with_mobile<I, S>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mobile = numbers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Company, if supplied and not blank.
    pub fn company(&self) -> Option<&str> {
        non_blank(self.company.as_deref())
    }

    /// Email, if supplied and not blank.
    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// Note, if supplied and not blank.
    pub fn note(&self) -> Option<&str> {
        non_blank(self.note.as_deref())
    }

    /// Phone numbers with blank entries removed.
    pub fn phone_numbers(&self) -> impl Iterator<Item = &str> {
        self.mobile
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Errors from parsing a resource name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceNameError {
    /// Nothing left after trimming.
    #[error("resource name is empty")]
    Empty,
    /// Not a person resource, or the id has invalid characters.
    #[error("invalid resource name {0:?}: expected people/<id> or <id>")]
    Invalid(String),
}

/// A person resource name such as `people/c8421977351834`.
///
/// Parsing accepts either the full name or the bare id that commands print,
/// so `123` and `people/123` are the same resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Parses a full resource name or a bare id.
    pub fn parse(raw: &str) -> Result<Self, ResourceNameError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ResourceNameError::Empty);
        }

        let id = raw.strip_prefix(PEOPLE_PREFIX).unwrap_or(raw);
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ResourceNameError::Invalid(raw.to_string()));
        }

        Ok(Self(format!("{}{}", PEOPLE_PREFIX, id)))
    }

    /// The full resource name, `people/<id>`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id without the `people/` prefix, for display.
    pub fn id(&self) -> &str {
        &self.0[PEOPLE_PREFIX.len()..]
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceName {
    type Err = ResourceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourceName {
    type Error = ResourceNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ResourceName> for String {
    fn from(value: ResourceName) -> Self {
        value.0
    }
}
