//! UI theme kept in the browser session

use std::fmt;

use serde::{Deserialize, Serialize};

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark theme, assumed when nothing is stored
    #[default]
    Dark,
    /// Light theme
    Light,
}

impl Theme {
    /// Session representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse a session value
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// The opposite theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Theme after a toggle request given whatever the session holds
    ///
    /// A missing value counts as dark, so the first toggle yields light.
    /// An unrecognised value is replaced with light.
    #[must_use]
    pub fn toggle_from(current: Option<&str>) -> Self {
        match current.filter(|v| !v.is_empty()) {
            None => Self::Dark.toggled(),
            Some(value) => Self::parse(value).map_or(Self::Light, Self::toggled),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
