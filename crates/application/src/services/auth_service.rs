//! Authentication service
//!
//! Local email/password login backed by server-side sessions, plus the
//! OIDC-only mode in which the login page hands off to the single configured
//! identity provider.

use std::{fmt, sync::Arc, time::Duration};

use domain::{EmailAddress, User};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{FlashMessage, PasswordHasherPort, Session, SessionId, SessionStore, UserStore},
};

const INVALID_CREDENTIALS: &str = "Please enter a correct email and password";

/// Well-formed Argon2id hash that matches no password
///
/// Verified against when the email is unknown so that the response takes as
/// long as a real failed login.
pub const UNKNOWN_ACCOUNT_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c3BlbmRib29rLXRpbWluZw$XzUz8HFIuaIDWORocpb0goqgqgjaSl8GdcifECaRYbM";

/// An external identity provider offered on the login page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalProvider {
    /// Stable provider identifier
    pub id: String,
    /// Name shown on the login button
    pub name: String,
    /// Authorization server URL users are sent to
    pub server_url: String,
}

/// Authentication policy resolved from configuration
#[derive(Debug, Clone)]
pub struct AuthOptions {
    /// Only external providers may be used to log in
    pub oidc_only: bool,
    /// Registered external providers
    pub providers: Vec<ExternalProvider>,
    /// Lifetime of a new session
    pub session_ttl: Duration,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            oidc_only: false,
            providers: Vec::new(),
            session_ttl: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}

/// What the login page should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEntry {
    /// Send the browser straight to the identity provider
    Redirect(String),
    /// Render the local login form, listing any external providers
    Form { providers: Vec<ExternalProvider> },
}

/// Service for logging users in and out
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: Arc<dyn PasswordHasherPort>,
    options: AuthOptions,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        hasher: Arc<dyn PasswordHasherPort>,
        options: AuthOptions,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            options,
        }
    }

    /// Decide how the login page behaves
    ///
    /// In OIDC-only mode with exactly one provider the user is redirected to
    /// it. Any other provider count is a configuration error reported at
    /// startup, so the form is shown instead of guessing a provider.
    pub fn login_entry(&self) -> LoginEntry {
        if self.options.oidc_only {
            if let [provider] = self.options.providers.as_slice() {
                return LoginEntry::Redirect(provider.server_url.clone());
            }
            warn!(
                providers = self.options.providers.len(),
                "OIDC-only login requested without exactly one provider"
            );
        }
        LoginEntry::Form {
            providers: self.options.providers.clone(),
        }
    }

    /// Verify credentials and open a session
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApplicationError> {
        if self.options.oidc_only {
            return Err(ApplicationError::NotAuthorized(
                "Password login is disabled; use the external provider".to_string(),
            ));
        }

        let Ok(email) = EmailAddress::new(email) else {
            return Err(ApplicationError::NotAuthorized(INVALID_CREDENTIALS.to_string()));
        };

        let Some(user) = self.users.find_by_email(&email).await? else {
            // outcome is irrelevant, only the cost matters
            let _ = self.hasher.verify(password, UNKNOWN_ACCOUNT_HASH);
            debug!("Login attempt for unknown email");
            return Err(ApplicationError::NotAuthorized(INVALID_CREDENTIALS.to_string()));
        };

        let verified = self.hasher.verify(password, &user.password_hash)?;
        if !user.is_active || !verified {
            debug!(user_id = %user.id, "Login rejected");
            return Err(ApplicationError::NotAuthorized(INVALID_CREDENTIALS.to_string()));
        }

        let session = Session::new(user.id, self.options.session_ttl);
        self.sessions.insert(&session).await?;
        info!(user_id = %user.id, "User logged in");
        Ok(session)
    }

    /// Close a session; unknown sessions are ignored
    #[instrument(skip(self))]
    pub async fn logout(&self, session_id: &SessionId) -> Result<(), ApplicationError> {
        if self.sessions.destroy(session_id).await? {
            info!("User logged out");
        }
        Ok(())
    }

    /// Resolve a session cookie to its live session and active user
    pub async fn authenticate(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<(Session, User)>, ApplicationError> {
        let Some(session) = self.sessions.get(session_id).await? else {
            return Ok(None);
        };
        match self.users.get(session.user_id).await? {
            Some(user) if user.is_active => Ok(Some((session, user))),
            _ => {
                self.sessions.destroy(session_id).await?;
                Ok(None)
            },
        }
    }

    /// Drop sessions past their expiry
    pub async fn purge_expired_sessions(&self) -> Result<usize, ApplicationError> {
        self.sessions.purge_expired().await
    }

    /// Queue a flash message on the session
    pub async fn flash(
        &self,
        session: &mut Session,
        message: FlashMessage,
    ) -> Result<(), ApplicationError> {
        session.push_message(message);
        self.sessions.save(session).await
    }

    /// Drain the session's pending flash messages
    pub async fn take_messages(
        &self,
        session: &mut Session,
    ) -> Result<Vec<FlashMessage>, ApplicationError> {
        let messages = session.take_messages();
        if !messages.is_empty() {
            self.sessions.save(session).await?;
        }
        Ok(messages)
    }
}
