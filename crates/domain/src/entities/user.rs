//! User account entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{EmailAddress, UserId};

/// An application user
///
/// The password is only ever held as a PHC-formatted hash and is never
/// serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    pub id: UserId,
    /// Login email address
    pub email: EmailAddress,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Argon2id hash of the password
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Inactive users cannot log in
    pub is_active: bool,
    /// Superusers manage other accounts
    pub is_superuser: bool,
    /// When the account was created
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Name shown in the interface, falling back to the email address
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.to_string()
        } else {
            full.to_string()
        }
    }

    /// Whether this user may edit the account identified by `target`
    #[must_use]
    pub fn can_edit(&self, target: UserId) -> bool {
        self.is_superuser || self.id == target
    }
}
