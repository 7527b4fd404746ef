//! In-memory session store
//!
//! Sessions live for the lifetime of the process. Expired entries are hidden
//! on read and removed by `purge_expired`.

use std::collections::HashMap;

use application::{
    error::ApplicationError,
    ports::{Session, SessionId, SessionStore},
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

/// Process-local session store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: &Session) -> Result<(), ApplicationError> {
        self.sessions
            .write()
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, ApplicationError> {
        let now = Utc::now();
        Ok(self
            .sessions
            .read()
            .get(id)
            .filter(|s| !s.is_expired_at(now))
            .cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), ApplicationError> {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(&session.id) {
            Some(stored) => {
                *stored = session.clone();
                Ok(())
            },
            None => Err(ApplicationError::NotFound(
                "Session no longer exists".to_string(),
            )),
        }
    }

    async fn destroy(&self, id: &SessionId) -> Result<bool, ApplicationError> {
        Ok(self.sessions.write().remove(id).is_some())
    }

    async fn purge_expired(&self) -> Result<usize, ApplicationError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        let purged = before - sessions.len();
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }
        Ok(purged)
    }
}
