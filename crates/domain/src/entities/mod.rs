//! Domain entities - Objects with identity and lifecycle

mod user;
mod user_settings;

pub use user::User;
pub use user_settings::UserSettings;
