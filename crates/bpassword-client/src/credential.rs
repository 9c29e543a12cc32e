//! Credential type definitions

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// A stored site/account secret record, as returned by the server.
///
/// The id is server-assigned and immutable; the client never generates one.
/// Server copies are authoritative - after any mutation, callers re-fetch the
/// list rather than patching a held copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Server-assigned identifier
    pub id: i64,

    /// Display label
    pub name: String,

    /// Account identifier
    #[serde(default)]
    pub username: String,

    /// Secret value
    pub password: String,

    /// Associated site URL (free text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Fields submitted when creating or replacing a credential.
///
/// Carries no id: create lets the server assign one, update addresses the
/// record through the endpoint path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialDraft {
    /// Display label (required, non-empty after trimming)
    pub name: String,

    /// Account identifier
    #[serde(default)]
    pub username: String,

    /// Secret value
    pub password: String,

    /// Associated site URL (free text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CredentialDraft {
    /// Create a draft with the required fields
    pub fn new(name: &str, username: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            url: None,
            notes: None,
        }
    }

    /// Set the site URL
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// Set the notes
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Check the draft is submittable: the name must be non-empty after
    /// trimming.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::RequestFailed("Name is required".to_string()));
        }
        Ok(())
    }
}

impl From<Credential> for CredentialDraft {
    /// Full-replacement body for an update, derived from a fetched record
    fn from(credential: Credential) -> Self {
        Self {
            name: credential.name,
            username: credential.username,
            password: credential.password,
            url: credential.url,
            notes: credential.notes,
        }
    }
}
