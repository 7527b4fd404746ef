//! User account storage port

use async_trait::async_trait;
use domain::{EmailAddress, User, UserId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Data for an account that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

/// Port for user account persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users ordered by ascending id
    async fn list(&self) -> Result<Vec<User>, ApplicationError>;

    /// Get a user by id
    async fn get(&self, id: UserId) -> Result<Option<User>, ApplicationError>;

    /// Look up a user by login email
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, ApplicationError>;

    /// Store a new user and return it with its assigned id
    ///
    /// Fails with `ApplicationError::Conflict` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, ApplicationError>;

    /// Persist changes to an existing user
    async fn update(&self, user: &User) -> Result<(), ApplicationError>;

    /// Number of stored users
    async fn count(&self) -> Result<u64, ApplicationError>;
}
