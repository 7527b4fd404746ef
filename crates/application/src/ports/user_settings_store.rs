//! User settings storage port

use async_trait::async_trait;
use domain::{UserId, UserSettings};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for per-user preference persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserSettingsStore: Send + Sync {
    /// Load the settings for a user, creating defaults on first access
    async fn get_or_create(&self, user_id: UserId) -> Result<UserSettings, ApplicationError>;

    /// Persist the settings
    async fn save(&self, settings: &UserSettings) -> Result<(), ApplicationError>;
}
