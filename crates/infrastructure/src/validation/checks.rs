//! The individual startup checks
//!
//! Each check is a plain function of the environment snapshot and the resolved
//! configuration. Checks never fail; anomalies come back as findings in the
//! order their variables are declared.

use super::finding::{Finding, codes};
use crate::{
    config::AppConfig,
    env::{EnvSnapshot, is_integer_literal},
};

/// How a setting is validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Must be set to a non-empty value
    RequiredString,
    /// Must parse as an integer when set
    Integer,
    /// Must parse as an integer when its gate is enabled
    ConditionalInteger,
}

/// A statically declared setting and what it is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingCheck {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: CheckKind,
}

impl SettingCheck {
    const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: CheckKind::RequiredString,
        }
    }

    const fn integer(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: CheckKind::Integer,
        }
    }
}

/// Variables that must always be set
pub const REQUIRED_SETTINGS: &[SettingCheck] = &[
    SettingCheck::required(
        "SECRET_KEY",
        "This is used to provide cryptographic signing.",
    ),
    SettingCheck::required("SQL_DATABASE", "The name of your database."),
];

/// Variables that must be integers when set
pub const INTEGER_SETTINGS: &[SettingCheck] = &[
    SettingCheck::integer("TASK_WORKERS", "How many workers to have for async tasks."),
    SettingCheck::integer(
        "SESSION_EXPIRY_TIME",
        "The age of session cookies, in seconds.",
    ),
    SettingCheck::integer("INTERNAL_PORT", "The port on which the app listens on."),
    SettingCheck::integer(
        "DJANGO_VITE_DEV_SERVER_PORT",
        "The port where Vite's dev server is running",
    ),
];

/// Gate of the soft-delete retention check
pub const SOFT_DELETE_FLAG: &str = "ENABLE_SOFT_DELETE";

/// Retention period checked while soft delete is enabled
pub const SOFT_DELETE_RETENTION: SettingCheck = SettingCheck {
    name: "KEEP_DELETED_TRANSACTIONS_FOR",
    description: "Time in days to keep soft deleted transactions for. Set to 0 to keep all transactions indefinitely.",
    kind: CheckKind::ConditionalInteger,
};

pub(crate) const REQUIRED_CHECK: &str = "required_settings";
pub(crate) const INTEGER_CHECK: &str = "integer_settings";
pub(crate) const SOFT_DELETE_CHECK: &str = "soft_delete_retention";
pub(crate) const OIDC_CHECK: &str = "oidc_providers";

/// Every required variable has a non-empty value
pub fn check_required_settings(env: &EnvSnapshot, _config: &AppConfig) -> Vec<Finding> {
    REQUIRED_SETTINGS
        .iter()
        .filter(|setting| env.non_empty(setting.name).is_none())
        .map(|setting| {
            Finding::error(
                REQUIRED_CHECK,
                codes::MISSING_REQUIRED,
                format!("required variable '{}' is not set", setting.name),
                format!(
                    "{} Please set this variable in your .env file or environment.",
                    setting.description
                ),
            )
            .for_variable(setting.name)
        })
        .collect()
}

/// Every integer variable that is present parses as an integer
///
/// Absent variables are skipped; an empty value is present and fails.
pub fn check_integer_settings(env: &EnvSnapshot, _config: &AppConfig) -> Vec<Finding> {
    INTEGER_SETTINGS
        .iter()
        .filter_map(|setting| {
            let value = env.get(setting.name)?;
            if is_integer_literal(value) {
                return None;
            }
            Some(
                Finding::error(
                    INTEGER_CHECK,
                    codes::INVALID_INTEGER,
                    format!(
                        "variable '{}' must be a valid integer, got '{value}'",
                        setting.name
                    ),
                    setting.description,
                )
                .for_variable(setting.name),
            )
        })
        .collect()
}

/// The retention period parses while soft delete is enabled
pub fn check_soft_delete_retention(env: &EnvSnapshot, _config: &AppConfig) -> Vec<Finding> {
    if !env.flag(SOFT_DELETE_FLAG) {
        return Vec::new();
    }
    let name = SOFT_DELETE_RETENTION.name;
    match env.get(name) {
        Some(value) if !is_integer_literal(value) => vec![
            Finding::error(
                SOFT_DELETE_CHECK,
                codes::INVALID_RETENTION,
                format!(
                    "variable '{name}' must be a valid integer when {SOFT_DELETE_FLAG} is true, got '{value}'"
                ),
                SOFT_DELETE_RETENTION.description,
            )
            .for_variable(name),
        ],
        _ => Vec::new(),
    }
}

/// OIDC-only mode has exactly one provider to hand off to
pub fn check_oidc_providers(_env: &EnvSnapshot, config: &AppConfig) -> Vec<Finding> {
    let count = config.auth.providers.len();
    if !config.auth.oidc_only || count == 1 {
        return Vec::new();
    }
    vec![
        Finding::error(
            OIDC_CHECK,
            codes::OIDC_PROVIDER_COUNT,
            format!(
                "OIDC_ONLY is enabled but {count} authentication providers are configured; exactly one is required"
            ),
            "Configure a single OpenID Connect provider or set OIDC_ONLY to false.",
        )
        .for_variable("OIDC_ONLY"),
    ]
}
