//! Cooperative shutdown
//!
//! SIGINT/SIGTERM cancel a shared token. The run loop checks it between
//! items, and every wait goes through [sleep_or_cancel].

use std::time::Duration;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Resolves when the process receives Ctrl+C or (on unix) SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, finishing current item");
        },
        _ = terminate => {
            info!("Received terminate signal, finishing current item");
        },
    }
}

/// Cancel `token` when a shutdown signal arrives.
pub fn spawn_signal_listener(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        shutdown_signal().await;
        token.cancel();
    })
}

/// Sleep for `duration` unless cancelled first. Returns true if cancelled.
pub async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    if duration.is_zero() {
        return token.is_cancelled();
    }
    tokio::select! {
        _ = token.cancelled() => true,
        _ = tokio::time::sleep(duration) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sleep_completes_without_cancel() {
        let token = CancellationToken::new();
        assert!(!sleep_or_cancel(&token, Duration::from_millis(5)).await);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_long_sleep() {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            child.cancel();
        });

        let started = std::time::Instant::now();
        assert!(sleep_or_cancel(&token, Duration::from_secs(60)).await);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
