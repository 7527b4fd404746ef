//! Application services - use cases behind the HTTP and CLI surfaces

mod auth_service;
mod preference_service;
mod user_service;

pub use auth_service::{
    AuthOptions, AuthService, ExternalProvider, LoginEntry, UNKNOWN_ACCOUNT_HASH,
};
pub use preference_service::{PreferenceService, ToggleOutcome, UpdateSettingsRequest};
pub use user_service::{NewUserRequest, UpdateUserRequest, UserService};
