//! Wire and domain types shared with the sharing service.
//!
//! The service speaks loose JSON: lists may arrive as `null`, versions as
//! either numbers or strings, and the author is a JSON document embedded in
//! a string. Everything is normalized here so the rest of the crate only
//! deals with well-formed values.

use chrono::{DateTime, TimeZone, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use crate::constants::LIVE_ACCESS_PERMISSION;

/// A user known to the sharing service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Contact {
    /// Parse the JSON-encoded author field of a record.
    ///
    /// Malformed input yields an empty contact; the failure is only logged.
    pub fn parse_author(raw: &str) -> Self {
        match serde_json::from_str::<Contact>(raw) {
            Ok(contact) => contact,
            Err(e) => {
                warn!("Could not parse author identity {:?}: {}", raw, e);
                Self::default()
            }
        }
    }

    /// Name to show in the UI, falling back to the email and then "Unknown".
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.email.is_empty() {
            &self.email
        } else {
            "Unknown"
        }
    }
}

/// A user a record is shared with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: BTreeSet<String>,
}

impl Collaborator {
    /// Viewer-level collaborator built from a contact.
    pub fn from_contact(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            email: contact.email,
            permissions: BTreeSet::new(),
        }
    }

    /// Editor-level access is granted by the live access permission.
    pub fn is_editor(&self) -> bool {
        self.permissions.contains(LIVE_ACCESS_PERMISSION)
    }

    pub fn set_editor(&mut self, editor: bool) {
        if editor {
            self.permissions.insert(LIVE_ACCESS_PERMISSION.to_string());
        } else {
            self.permissions.remove(LIVE_ACCESS_PERMISSION);
        }
    }

    pub fn role_label(&self) -> &'static str {
        if self.is_editor() {
            "Editor"
        } else {
            "Viewer"
        }
    }
}

/// Metadata of one published document as known to the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedRecord {
    pub id: String,
    /// JSON-encoded [`Contact`]
    #[serde(default)]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_modified: String,
    #[serde(default, deserialize_with = "lenient_version")]
    pub version: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shareable_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collaborators: Vec<Collaborator>,
    #[serde(rename = "liveEnabled", default, deserialize_with = "null_as_default")]
    pub live_enabled: bool,
    #[serde(rename = "isReadOnly", default, deserialize_with = "null_as_default")]
    pub is_read_only: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub author_server_url: String,
}

impl SharedRecord {
    pub fn author_contact(&self) -> Contact {
        Contact::parse_author(&self.author)
    }

    /// Collaborators without the record's author, who is shown separately as owner.
    pub fn visible_collaborators(&self) -> Vec<&Collaborator> {
        let author = self.author_contact();
        self.collaborators
            .iter()
            .filter(|c| author.id.is_empty() || c.id != author.id)
            .collect()
    }

    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        parse_epoch(&self.last_modified)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_epoch(&self.created)
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled.ipynb"
        } else {
            &self.title
        }
    }
}

/// Parse a server timestamp.
///
/// Numeric values are epochs whose unit is inferred from their magnitude
/// (milliseconds, microseconds or nanoseconds); RFC 3339 strings are also
/// accepted.
pub fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(value) = raw.parse::<i64>() {
        let digits = value.unsigned_abs().to_string().len();
        let millis = match digits {
            0..=14 => value,
            15..=17 => value / 1_000,
            _ => value / 1_000_000,
        };
        return Utc.timestamp_millis_opt(millis).single();
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
}

/// Payload sent to the service when publishing a local document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentsModel {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created: String,
    pub last_modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    pub content: serde_json::Value,
    pub format: String,
}

/// Partial record sent with PATCH requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRequest {
    pub id: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Vec<Collaborator>>,
    #[serde(rename = "liveEnabled", skip_serializing_if = "Option::is_none")]
    pub live_enabled: Option<bool>,
}

impl UpdateRequest {
    /// Full update carrying the record's collaborators and live flag.
    pub fn from_record(record: &SharedRecord) -> Self {
        Self {
            id: record.id.clone(),
            author: record.author.clone(),
            title: (!record.title.is_empty()).then(|| record.title.clone()),
            collaborators: Some(record.collaborators.clone()),
            live_enabled: Some(record.live_enabled),
        }
    }

    /// Update that only flips live collaboration.
    pub fn live_only(record: &SharedRecord, live_enabled: bool) -> Self {
        Self {
            id: record.id.clone(),
            author: record.author.clone(),
            title: None,
            collaborators: None,
            live_enabled: Some(live_enabled),
        }
    }
}

/// Rendered preview of a published document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_modified: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shareable_link: String,
    #[serde(default, deserialize_with = "lenient_version")]
    pub version: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub html: String,
}

/// Snapshot of the sidebar lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedLists {
    #[serde(rename = "sharedByMe")]
    pub shared_by_me: Vec<SharedRecord>,
    #[serde(rename = "sharedWithMe")]
    pub shared_with_me: Vec<SharedRecord>,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Versions are sent as numbers by some endpoints and as strings by others.
fn lenient_version<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(0),
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("invalid version number: {n}"))),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(0),
        Some(serde_json::Value::String(s)) => s
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid version string: {s}"))),
        Some(other) => Err(D::Error::custom(format!("invalid version: {other}"))),
    }
}
