//! Adapters implementing application ports

pub mod memory_session_store;
pub mod password_hasher;

pub use memory_session_store::InMemorySessionStore;
pub use password_hasher::{Argon2PasswordHasher, PasswordHashError};
