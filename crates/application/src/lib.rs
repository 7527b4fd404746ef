//! Application layer - Use cases and orchestration
//!
//! Defines the ports the infrastructure implements and the services that
//! drive login, user management and preference toggles.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
