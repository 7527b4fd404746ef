//! Ports - Interfaces implemented by the infrastructure layer

mod password_hasher;
mod session_store;
mod user_settings_store;
mod user_store;

pub use password_hasher::PasswordHasherPort;
pub use session_store::{FlashMessage, MessageLevel, Session, SessionId, SessionStore};
pub use user_settings_store::UserSettingsStore;
pub use user_store::{NewUser, UserStore};

#[cfg(test)]
pub use password_hasher::MockPasswordHasherPort;
#[cfg(test)]
pub use session_store::MockSessionStore;
#[cfg(test)]
pub use user_settings_store::MockUserSettingsStore;
#[cfg(test)]
pub use user_store::MockUserStore;
