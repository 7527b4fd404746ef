//! Start page preference
//!
//! The page a user lands on after opening the application root.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Landing page selected in the user settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartPage {
    /// Monthly overview
    #[default]
    Monthly,
    /// Yearly overview grouped by account
    YearlyAccount,
    /// Yearly overview grouped by currency
    YearlyCurrency,
    /// Current net worth
    NetworthCurrent,
    /// Projected net worth
    NetworthProjected,
    /// Every transaction
    AllTransactions,
    /// Calendar view
    Calendar,
}

impl StartPage {
    /// All start pages in menu order
    pub const ALL: [Self; 7] = [
        Self::Monthly,
        Self::YearlyAccount,
        Self::YearlyCurrency,
        Self::NetworthCurrent,
        Self::NetworthProjected,
        Self::AllTransactions,
        Self::Calendar,
    ];

    /// Stored representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::YearlyAccount => "YEARLY_ACCOUNT",
            Self::YearlyCurrency => "YEARLY_CURRENCY",
            Self::NetworthCurrent => "NETWORTH_CURRENT",
            Self::NetworthProjected => "NETWORTH_PROJECTED",
            Self::AllTransactions => "ALL_TRANSACTIONS",
            Self::Calendar => "CALENDAR",
        }
    }

    /// Parse a stored value; anything unrecognised falls back to the monthly view
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|page| page.as_str().eq_ignore_ascii_case(value.trim()))
            .unwrap_or_default()
    }

    /// Path the application root redirects to
    #[must_use]
    pub const fn route(&self) -> &'static str {
        match self {
            Self::Monthly => "/monthly/",
            Self::YearlyAccount => "/yearly/account/",
            Self::YearlyCurrency => "/yearly/currency/",
            Self::NetworthCurrent => "/net-worth/current/",
            Self::NetworthProjected => "/net-worth/projected/",
            Self::AllTransactions => "/transactions/all/",
            Self::Calendar => "/calendar/",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::YearlyAccount => "Yearly by account",
            Self::YearlyCurrency => "Yearly by currency",
            Self::NetworthCurrent => "Current Net Worth",
            Self::NetworthProjected => "Projected Net Worth",
            Self::AllTransactions => "All Transactions",
            Self::Calendar => "Calendar",
        }
    }
}

impl fmt::Display for StartPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_monthly() {
        assert_eq!(StartPage::default(), StartPage::Monthly);
    }

    #[test]
    fn stored_values_round_trip() {
        for page in StartPage::ALL {
            assert_eq!(StartPage::from_stored(page.as_str()), page);
        }
    }

    #[test]
    fn unknown_stored_value_falls_back_to_monthly() {
        assert_eq!(StartPage::from_stored("DASHBOARD"), StartPage::Monthly);
        assert_eq!(StartPage::from_stored(""), StartPage::Monthly);
    }

    #[test]
    fn every_page_has_a_distinct_route() {
        let mut routes: Vec<_> = StartPage::ALL.iter().map(StartPage::route).collect();
        routes.sort_unstable();
        routes.dedup();
        assert_eq!(routes.len(), StartPage::ALL.len());
    }

    #[test]
    fn serializes_as_stored_value() {
        let json = serde_json::to_string(&StartPage::NetworthProjected).unwrap();
        assert_eq!(json, "\"NETWORTH_PROJECTED\"");
    }
}
