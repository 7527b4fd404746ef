//! Domain layer for Spendbook
//!
//! Contains users, per-user preferences and the value objects they are built from.
//! This layer performs no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
