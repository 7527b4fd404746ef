//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: SQLite persistence,
//! the in-memory session store and Argon2 password hashing. Also owns
//! configuration loading and the startup checks run against it.

pub mod adapters;
pub mod config;
pub mod env;
pub mod persistence;
pub mod telemetry;
pub mod validation;

pub use adapters::*;
pub use config::{
    AppConfig, AuthConfig, AuthProviderConfig, DatabaseConfig, Environment, ServerConfig,
};
pub use env::{EnvSnapshot, is_integer_literal};
pub use persistence::{
    ConnectionPool, DatabaseError, SqliteUserSettingsStore, SqliteUserStore, create_pool,
};
pub use telemetry::{LogFormat, init_tracing};
pub use validation::{CheckReport, Finding, Severity, StartupValidator};
