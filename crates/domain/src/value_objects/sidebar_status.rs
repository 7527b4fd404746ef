//! Sidebar layout kept in the browser session

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether the sidebar floats over content or is pinned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarStatus {
    /// Floating sidebar, assumed when nothing is stored
    #[default]
    Floating,
    /// Pinned sidebar
    Fixed,
}

impl SidebarStatus {
    /// Session representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Floating => "floating",
            Self::Fixed => "fixed",
        }
    }

    /// Parse a session value
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "floating" => Some(Self::Floating),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }

    /// The opposite status
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Floating => Self::Fixed,
            Self::Fixed => Self::Floating,
        }
    }

    /// Status after a toggle request given whatever the session holds
    ///
    /// A missing value counts as floating; an unrecognised value becomes fixed.
    #[must_use]
    pub fn toggle_from(current: Option<&str>) -> Self {
        match current.filter(|v| !v.is_empty()) {
            None => Self::Floating.toggled(),
            Some(value) => Self::parse(value).map_or(Self::Fixed, Self::toggled),
        }
    }
}

impl fmt::Display for SidebarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
