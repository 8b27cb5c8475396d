//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account stored in the database
///
/// The password hash is never serialized into responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-generated row id
    pub id: i64,

    /// Display name (optional)
    pub name: Option<String>,

    /// Unique login name
    pub username: String,

    /// Argon2id password digest (PHC string)
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Display name with the listing-page fallback
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("No Name")
    }
}

/// Payload for inserting a new user row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: Option<String>,
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    /// Create an insert payload without a display name
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            name: None,
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
