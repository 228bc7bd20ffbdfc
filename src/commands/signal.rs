//! Interrupt handling for the CLI
//!
//! The first interrupt asks the run to stop dispatching and wait for the
//! repositories in flight. A second interrupt gives up on them.

use std::future::Future;
use tracing::instrument::WithSubscriber;

/// Resolves on the first interrupt, then arms `force_exit` for the next one
///
/// `next_interrupt` is called once per interrupt to wait for. If waiting
/// fails the returned future never resolves, so the run is not cancelled by
/// a missing signal handler.
pub async fn interrupt_then_force<N, Fut, X>(mut next_interrupt: N, force_exit: X)
where
    N: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = std::io::Result<()>> + Send + 'static,
    X: FnOnce() + Send + 'static,
{
    if let Err(e) = next_interrupt().await {
        tracing::warn!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("interrupt received, finishing in-flight repositories (Ctrl-C again to abort)");

    let second = next_interrupt();
    tokio::spawn(
        async move {
            if second.await.is_ok() {
                tracing::warn!("second interrupt, aborting");
                force_exit();
            }
        }
        .with_current_subscriber(),
    );
}

/// Ctrl-C for the binary; a second Ctrl-C exits with status 130
pub async fn shutdown_signal() {
    interrupt_then_force(tokio::signal::ctrl_c, || std::process::exit(130)).await
}
