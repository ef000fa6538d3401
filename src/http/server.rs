//! HTTP server runner.
//!
//! Binds the listener, serves the router, and coordinates graceful shutdown
//! on SIGINT/SIGTERM with a bounded drain window. The connection pool is
//! closed on the way out.

use crate::db::PoolManager;
use crate::error::{ApiError, ApiResult};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

/// How long to wait for in-flight requests after a shutdown signal.
const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

/// Serve the app until a shutdown signal arrives, then drain and close the pool.
pub async fn serve(app: Router, bind_addr: &str, pools: Arc<PoolManager>) -> ApiResult<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| ApiError::unavailable(format!("failed to bind to {}: {}", bind_addr, e)))?;

    info!(addr = %bind_addr, "Listening for HTTP requests");

    // Use a notify to coordinate shutdown timing
    let shutdown_notify = Arc::new(tokio::sync::Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    let shutdown_signal = async move {
        wait_for_signal().await;
        shutdown_notify_clone.notify_one();
    };

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal);

    // Race between: server completing normally vs forced timeout/second signal
    tokio::select! {
        result = server => {
            match result {
                Ok(()) => info!("HTTP server stopped"),
                Err(e) => {
                    error!(error = %e, "HTTP server error");
                    return Err(ApiError::unavailable(format!("HTTP server error: {}", e)));
                }
            }
        }
        _ = async {
            shutdown_notify.notified().await;
            info!(
                timeout_secs = GRACEFUL_TIMEOUT.as_secs(),
                "Waiting for connections to close (send signal again to force exit)..."
            );

            tokio::select! {
                _ = tokio::time::sleep(GRACEFUL_TIMEOUT) => {
                    warn!("Graceful shutdown timeout, forcing exit");
                }
                _ = wait_for_signal() => {
                    warn!("Received second signal, forcing immediate exit");
                }
            }
        } => {
            // Timeout or second signal reached - server will be dropped
        }
    }

    info!("Closing connection pool");
    pools.close().await;

    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
