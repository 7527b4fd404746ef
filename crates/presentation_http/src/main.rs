//! Spendbook HTTP Server
//!
//! Main entry point for the web application.

use std::{sync::Arc, time::Duration};

use infrastructure::{AppConfig, EnvSnapshot, LogFormat, StartupValidator, init_tracing};
use presentation_http::{
    ShutdownOutcome, build_state, create_router, serve_until, set_expose_internal_errors,
    tasks::spawn_session_cleanup_task,
};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

const DEFAULT_LOG_FILTER: &str = "spendbook_server=info,presentation_http=info,tower_http=info";

fn main() -> anyhow::Result<()> {
    let env = EnvSnapshot::capture();
    let config = AppConfig::load(&env)?;

    init_tracing(
        LogFormat::from_setting(&config.server.log_format),
        DEFAULT_LOG_FILTER,
    )?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Spendbook starting"
    );

    let validator = StartupValidator::standard();
    let findings = validator.validate(&env, &config);
    StartupValidator::log_findings(&findings);
    if StartupValidator::has_blocking(&findings) {
        anyhow::bail!(
            "configuration check failed with {} issue(s); refusing to start",
            findings.len()
        );
    }

    set_expose_internal_errors(!config.is_production());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.tasks.workers.max(1))
        .enable_all()
        .build()?;

    runtime.block_on(serve(config, env))
}

async fn serve(config: AppConfig, env: EnvSnapshot) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let state = build_state(config, env)?;
    let cleanup = spawn_session_cleanup_task(Arc::clone(&state.auth), None);
    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    let outcome = serve_until(listener, app, shutdown_signal(), shutdown_timeout).await?;

    cleanup.abort();
    match outcome {
        ShutdownOutcome::Drained => info!("Server shutdown complete"),
        ShutdownOutcome::TimedOut => warn!("Server shutdown forced after timeout"),
    }

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
