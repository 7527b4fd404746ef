//! Timezone value object

use std::fmt;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// An IANA timezone name, validated against the tz database
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timezone(String);

impl Timezone {
    /// Create a timezone from an IANA name such as `Europe/Lisbon`
    pub fn try_new(tz: impl Into<String>) -> Result<Self, DomainError> {
        let tz = tz.into();
        let trimmed = tz.trim();
        trimmed
            .parse::<Tz>()
            .map(|parsed| Self(parsed.name().to_string()))
            .map_err(|_| DomainError::InvalidTimezone(tz.clone()))
    }

    /// UTC timezone
    #[must_use]
    pub fn utc() -> Self {
        Self("UTC".to_string())
    }

    /// Get the timezone name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is a UTC timezone
    #[must_use]
    pub fn is_utc(&self) -> bool {
        matches!(self.0.as_str(), "UTC" | "Etc/UTC" | "Etc/GMT")
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Timezone {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Timezone> for String {
    fn from(tz: Timezone) -> Self {
        tz.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_zone_is_accepted() {
        let tz = Timezone::try_new("America/Sao_Paulo").unwrap();
        assert_eq!(tz.as_str(), "America/Sao_Paulo");
    }

    #[test]
    fn unknown_zone_is_rejected() {
        let err = Timezone::try_new("Mars/Olympus_Mons").unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn default_is_utc() {
        assert!(Timezone::default().is_utc());
    }

    #[test]
    fn deserialization_validates() {
        let tz: Timezone = serde_json::from_str("\"Europe/Berlin\"").unwrap();
        assert_eq!(tz.to_string(), "Europe/Berlin");
        assert!(serde_json::from_str::<Timezone>("\"Nowhere/Town\"").is_err());
    }
}
