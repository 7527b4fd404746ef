//! Diagnostic findings produced by startup checks

use std::fmt;

use serde::Serialize;

/// Stable finding codes
pub mod codes {
    /// A required variable is missing or empty
    pub const MISSING_REQUIRED: &str = "APP.E001";
    /// An integer variable does not parse
    pub const INVALID_INTEGER: &str = "APP.E002";
    /// Soft-delete retention does not parse while soft delete is enabled
    pub const INVALID_RETENTION: &str = "APP.E003";
    /// OIDC-only mode without exactly one provider
    pub const OIDC_PROVIDER_COUNT: &str = "APP.E004";
}

/// Severity level of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    /// Blocks startup
    Error,
    /// Blocks startup
    Critical,
}

impl Severity {
    /// Whether findings of this severity prevent the application from starting
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A configuration problem reported by a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// Stable code, e.g. `APP.E001`
    pub code: &'static str,
    pub message: String,
    /// What the operator should do about it
    pub hint: String,
    /// Name of the check that produced the finding
    pub check: &'static str,
    /// Offending variable, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
}

impl Finding {
    /// Create an error-level finding
    #[must_use]
    pub fn error(
        check: &'static str,
        code: &'static str,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            hint: hint.into(),
            check,
            variable: None,
        }
    }

    /// Attach the offending variable name
    #[must_use]
    pub fn for_variable(mut self, name: impl Into<String>) -> Self {
        self.variable = Some(name.into());
        self
    }

    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} - {}",
            self.severity, self.code, self.message, self.hint
        )
    }
}
