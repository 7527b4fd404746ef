//! Expired session cleanup task
//!
//! Periodically drops sessions whose expiry has passed so the in-memory store
//! does not grow without bound.

use std::{sync::Arc, time::Duration};

use application::AuthService;
use tracing::{debug, error, info};

/// Default cleanup interval: every 15 minutes
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 900;

/// Spawn a background task that purges expired sessions
///
/// Returns a `JoinHandle` that can be used to abort the task when shutting down.
pub fn spawn_session_cleanup_task(
    auth: Arc<AuthService>,
    cleanup_interval: Option<Duration>,
) -> tokio::task::JoinHandle<()> {
    let interval = cleanup_interval.unwrap_or(Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS));
    info!(interval_secs = interval.as_secs(), "Starting session cleanup task");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match auth.purge_expired_sessions().await {
                Ok(0) => debug!("No expired sessions"),
                Ok(removed) => info!(removed_count = removed, "Purged expired sessions"),
                Err(e) => error!(error = %e, "Session cleanup failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use infrastructure::{AppConfig, EnvSnapshot};

    use super::*;
    use crate::bootstrap::build_state;

    #[tokio::test]
    async fn task_can_be_aborted() {
        let mut config = AppConfig::default();
        config.database.path = ":memory:".to_string();
        let state = build_state(config, EnvSnapshot::default()).unwrap();

        let handle = spawn_session_cleanup_task(state.auth, Some(Duration::from_millis(10)));
        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }
}
