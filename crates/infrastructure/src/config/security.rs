//! Security configuration: signing key, sessions, demo mode.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Security configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Cryptographic signing key (`SECRET_KEY`)
    #[serde(default, skip_serializing)]
    pub secret_key: Option<SecretString>,

    /// Session cookie lifetime in seconds (`SESSION_EXPIRY_TIME`)
    #[serde(default = "default_session_expiry")]
    pub session_expiry_secs: u64,

    /// Demo deployment: account editing is disabled (`DEMO`)
    #[serde(default)]
    pub demo: bool,

    /// Mark the session cookie `Secure`
    #[serde(default)]
    pub secure_cookies: bool,
}

const fn default_session_expiry() -> u64 {
    2_592_000 // 30 days
}

impl SecurityConfig {
    /// Signing key as a string reference
    #[must_use]
    pub fn secret_key_str(&self) -> Option<&str> {
        self.secret_key.as_ref().map(ExposeSecret::expose_secret)
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field(
                "secret_key",
                &if self.secret_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("session_expiry_secs", &self.session_expiry_secs)
            .field("demo", &self.demo)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            session_expiry_secs: default_session_expiry(),
            demo: false,
            secure_cookies: false,
        }
    }
}
