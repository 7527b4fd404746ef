//! Browser session storage port
//!
//! Sessions carry the authenticated user, a small key/value map for
//! interface state such as the theme, and flash messages waiting to be shown.

use std::{collections::BTreeMap, fmt, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::UserId;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApplicationError;

/// Opaque session identifier carried in the session cookie
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap an identifier received from a client
    #[must_use]
    pub fn from_client(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Severity of a flash message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One-shot message shown on the next page render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl FlashMessage {
    /// Informational message
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            text: text.into(),
        }
    }

    /// Success message
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            text: text.into(),
        }
    }
}

/// Server-side session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub data: BTreeMap<String, String>,
    pub messages: Vec<FlashMessage>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for a user that lives for `ttl`
    #[must_use]
    pub fn new(user_id: UserId, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            id: SessionId::generate(),
            user_id,
            data: BTreeMap::new(),
            messages: Vec::new(),
            expires_at: Utc::now().checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Read a session value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Set a session value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    /// Queue a flash message
    pub fn push_message(&mut self, message: FlashMessage) {
        self.messages.push(message);
    }

    /// Remove and return all queued flash messages
    pub fn take_messages(&mut self) -> Vec<FlashMessage> {
        std::mem::take(&mut self.messages)
    }

    /// Whether the session has passed its expiry instant
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Port for session persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session
    async fn insert(&self, session: &Session) -> Result<(), ApplicationError>;

    /// Load a live session; expired sessions are discarded and reported as missing
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, ApplicationError>;

    /// Replace the stored state of an existing session
    async fn save(&self, session: &Session) -> Result<(), ApplicationError>;

    /// Remove a session, returning whether it existed
    async fn destroy(&self, id: &SessionId) -> Result<bool, ApplicationError>;

    /// Drop every expired session, returning how many were removed
    async fn purge_expired(&self) -> Result<usize, ApplicationError>;
}
