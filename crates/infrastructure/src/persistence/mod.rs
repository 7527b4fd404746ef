//! Persistence module
//!
//! SQLite-based storage for user accounts and their preferences.

pub mod connection;
pub mod error;
pub mod migrations;
pub mod user_settings_store;
pub mod user_store;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use user_settings_store::SqliteUserSettingsStore;
pub use user_store::SqliteUserStore;
