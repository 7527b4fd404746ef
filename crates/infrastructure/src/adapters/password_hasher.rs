//! Password hashing using Argon2
//!
//! Passwords are stored as PHC-formatted Argon2id strings, which carry their
//! own salt and parameters.
//!
//! # Examples
//!
//! ```
//! use infrastructure::adapters::Argon2PasswordHasher;
//!
//! let hasher = Argon2PasswordHasher::new();
//! let hash = hasher.hash_password("correct horse").unwrap();
//! assert!(hasher.verify_password("correct horse", &hash).unwrap());
//! assert!(!hasher.verify_password("battery staple", &hash).unwrap());
//! ```

use application::{error::ApplicationError, ports::PasswordHasherPort};
use argon2::{
    Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur while hashing or verifying passwords
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    /// The stored value is not a PHC string
    #[error("Invalid hash format: {0}")]
    InvalidHashFormat(String),
}

impl From<PasswordHashError> for ApplicationError {
    fn from(e: PasswordHashError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// Argon2id password hasher with the crate's default parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Hash a password with a fresh random salt
    #[instrument(skip_all)]
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        debug!("Hashed password");
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC string
    ///
    /// A mismatch is `Ok(false)`; only a malformed hash is an error.
    #[instrument(skip_all)]
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| PasswordHashError::InvalidHashFormat(e.to_string()))?;

        let matches = Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
        debug!(matches, "Verified password");
        Ok(matches)
    }

    /// Whether a value already looks like an Argon2 PHC string
    #[must_use]
    pub fn is_hashed(value: &str) -> bool {
        value.starts_with("$argon2")
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, ApplicationError> {
        Ok(self.hash_password(password)?)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, ApplicationError> {
        Ok(self.verify_password(password, hash)?)
    }
}
