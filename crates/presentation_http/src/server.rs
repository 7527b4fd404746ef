//! Serving with a bounded graceful shutdown

use std::time::Duration;

use axum::Router;
use tokio::{net::TcpListener, sync::watch};
use tracing::{info, warn};

/// How the server stopped after the shutdown signal fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every open connection finished within the grace period
    Drained,
    /// The grace period ran out and remaining connections were dropped
    TimedOut,
}

/// Serve `app` until `signal` resolves, then drain for at most `grace`
///
/// New connections stop being accepted as soon as the signal fires.
/// Requests still running when `grace` elapses are abandoned.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> std::io::Result<ShutdownOutcome>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (fired_tx, mut fired_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            let _ = fired_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        biased;
        result = &mut server => return result.map(|()| ShutdownOutcome::Drained),
        _ = fired_rx.wait_for(|fired| *fired) => {},
    }

    info!(grace_secs = grace.as_secs_f64(), "Waiting for connections to close");
    match tokio::time::timeout(grace, server).await {
        Ok(result) => result.map(|()| ShutdownOutcome::Drained),
        Err(_) => {
            warn!(
                grace_secs = grace.as_secs_f64(),
                "Shutdown grace period elapsed, dropping open connections"
            );
            Ok(ShutdownOutcome::TimedOut)
        },
    }
}
