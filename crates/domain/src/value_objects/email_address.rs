//! Email address value object with validation
//!
//! Users log in with their email address, so addresses are trimmed and
//! lower-cased before they are compared or stored.
//!
//! ```
//! use domain::EmailAddress;
//!
//! let email = EmailAddress::new("  Owner@Example.COM ").unwrap();
//! assert_eq!(email.as_str(), "owner@example.com");
//! assert!(EmailAddress::new("invalid").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::DomainError;

/// A validated, normalized email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress {
    #[validate(email)]
    value: String,
}

impl EmailAddress {
    /// Create a new email address, validating the format
    ///
    /// # Errors
    ///
    /// Returns an error if the email format is invalid.
    pub fn new(email: impl Into<String>) -> Result<Self, DomainError> {
        let value = email.into().trim().to_lowercase();

        let candidate = Self { value };
        candidate
            .validate()
            .map_err(|e| DomainError::InvalidEmailAddress(e.to_string()))?;

        Ok(candidate)
    }

    /// Get the email address as a string slice
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Get the local part (before @)
    pub fn local_part(&self) -> &str {
        self.value.split('@').next().unwrap_or("")
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_is_accepted() {
        let email = EmailAddress::new("user@example.com").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn login_variants_normalize_to_the_same_address() {
        let a = EmailAddress::new("Owner@Example.com").unwrap();
        let b = EmailAddress::new(" owner@example.COM ").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_email_is_rejected() {
        assert!(EmailAddress::new("not-an-email").is_err());
        assert!(EmailAddress::new("@nodomain.com").is_err());
        assert!(EmailAddress::new("").is_err());
    }

    #[test]
    fn local_part_is_extracted() {
        let email = EmailAddress::new("jane.doe@example.org").unwrap();
        assert_eq!(email.local_part(), "jane.doe");
    }

    #[test]
    fn deserialization_validates() {
        let parsed: EmailAddress = serde_json::from_str("\"A@B.io\"").unwrap();
        assert_eq!(parsed.as_str(), "a@b.io");
        assert!(serde_json::from_str::<EmailAddress>("\"nope\"").is_err());
    }
}
