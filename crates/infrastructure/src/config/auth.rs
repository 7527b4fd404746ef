//! External authentication provider configuration.

use application::ExternalProvider;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// An OIDC identity provider registration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthProviderConfig {
    /// Stable identifier, e.g. "keycloak"
    pub id: String,

    /// Button label on the login page
    #[serde(default)]
    pub name: String,

    /// Authorization server URL
    pub server_url: String,

    /// OAuth client id
    pub client_id: String,

    /// OAuth client secret
    #[serde(default, skip_serializing)]
    pub client_secret: Option<SecretString>,
}

impl std::fmt::Debug for AuthProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProviderConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("server_url", &self.server_url)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl AuthProviderConfig {
    /// Public view of the provider for the login page
    #[must_use]
    pub fn to_external(&self) -> ExternalProvider {
        ExternalProvider {
            id: self.id.clone(),
            name: if self.name.is_empty() {
                self.id.clone()
            } else {
                self.name.clone()
            },
            server_url: self.server_url.clone(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Disable password login and use the single external provider (`OIDC_ONLY`)
    #[serde(default)]
    pub oidc_only: bool,

    /// Registered external providers
    #[serde(default)]
    pub providers: Vec<AuthProviderConfig>,
}
