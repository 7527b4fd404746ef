//! Startup configuration validation
//!
//! Checks run once at boot against the environment snapshot and the resolved
//! configuration. Every problem becomes a [`Finding`]; the host refuses to
//! start when any finding is blocking.

pub mod checks;
pub mod finding;
pub mod validator;

pub use checks::{CheckKind, INTEGER_SETTINGS, REQUIRED_SETTINGS, SettingCheck};
pub use finding::{Finding, Severity, codes};
pub use validator::{CheckFn, CheckReport, StartupValidator};
