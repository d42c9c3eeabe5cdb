//! JSON HTTP facade over the converter.

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::router;

use crate::core::Converter;
use anyhow::{Context, Result};
use std::future::Future;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Serves until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    converter: Converter,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Listening on http://{addr}");
    axum::serve(listener, router(converter))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}

/// Serves until Ctrl-C.
pub async fn serve(listener: TcpListener, converter: Converter) -> Result<()> {
    serve_with_shutdown(listener, converter, shutdown_on(tokio::signal::ctrl_c())).await
}

/// Resolves when `signal` fires. If the handler could not be installed the
/// server keeps running instead of stopping at once.
async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutting down"),
        Err(error) => {
            warn!(%error, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_follows_signal() {
        let done = tokio::time::timeout(Duration::from_secs(1), shutdown_on(async { Ok(()) })).await;
        assert!(done.is_ok());
    }

    #[tokio::test]
    async fn test_signal_failure_keeps_serving() {
        let failed = async { Err(std::io::Error::other("no signal support")) };
        let done = tokio::time::timeout(Duration::from_millis(100), shutdown_on(failed)).await;
        assert!(done.is_err());
    }
}
