//! People API `Person` payloads.
//!
//! Only the fields this tool edits are typed. Everything else the API sends
//! back (`metadata`, `etag`, source info on each entry) lands in the
//! flattened `other` maps and is written back untouched, since
//! `updateContact` rejects a body without the fetched `etag`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use gcontacts_core::ContactFields;

/// Field mask used for reads and updates.
pub const PERSON_FIELDS: &str = "names,phoneNumbers,emailAddresses,organizations,biographies";

/// A contact as the People API represents it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// `people/<id>`, assigned by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,

    /// Version tag required by updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<Name>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<FieldValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email_addresses: Vec<FieldValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<Organization>,

    /// The contact note.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub biographies: Vec<FieldValue>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A phone number, email address or biography entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(default)]
    pub value: String,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl FieldValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            other: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Person {
    /// Builds the body of a `createContact` request.
    ///
    /// Blank optional fields are left out of the payload.
    pub fn from_fields(fields: &ContactFields) -> Self {
        Self {
            names: vec![Name {
                given_name: Some(fields.first_name.clone()),
                family_name: Some(fields.last_name.clone()),
                other: Map::new(),
            }],
            phone_numbers: fields.phone_numbers().map(FieldValue::new).collect(),
            email_addresses: fields.email().map(FieldValue::new).into_iter().collect(),
            organizations: fields
                .company()
                .map(|company| Organization {
                    name: Some(company.to_string()),
                    other: Map::new(),
                })
                .into_iter()
                .collect(),
            biographies: fields.note().map(FieldValue::new).into_iter().collect(),
            ..Default::default()
        }
    }

    /// Overlays caller-supplied fields onto a fetched contact.
    ///
    /// - the first name entry gets the new given and family name
    /// - phone numbers are replaced wholesale, never merged
    /// - email, company and note are only touched when supplied; an existing
    ///   first entry is overwritten, otherwise a non-blank value is inserted
    pub fn apply_fields(&mut self, fields: &ContactFields) {
        match self.names.first_mut() {
            Some(name) => {
                name.given_name = Some(fields.first_name.clone());
                name.family_name = Some(fields.last_name.clone());
            }
            None => self.names.push(Name {
                given_name: Some(fields.first_name.clone()),
                family_name: Some(fields.last_name.clone()),
                other: Map::new(),
            }),
        }

        self.phone_numbers = fields.phone_numbers().map(FieldValue::new).collect();

        if let Some(email) = fields.email.as_deref() {
            overlay_value(&mut self.email_addresses, email);
        }

        if let Some(company) = fields.company.as_deref() {
            let company = company.trim();
            match self.organizations.first_mut() {
                Some(org) => org.name = Some(company.to_string()),
                None if !company.is_empty() => self.organizations.push(Organization {
                    name: Some(company.to_string()),
                    other: Map::new(),
                }),
                None => {}
            }
        }

        if let Some(note) = fields.note.as_deref() {
            overlay_value(&mut self.biographies, note);
        }
    }

    /// Phone number values, in order.
    pub fn phone_values(&self) -> Vec<&str> {
        self.phone_numbers.iter().map(|p| p.value.as_str()).collect()
    }
}

fn overlay_value(entries: &mut Vec<FieldValue>, value: &str) {
    let value = value.trim();
    match entries.first_mut() {
        Some(entry) => entry.value = value.to_string(),
        None if !value.is_empty() => entries.push(FieldValue::new(value)),
        None => {}
    }
}
