//! OS signal handling.
//!
//! Ctrl-C (SIGINT) triggers the shutdown coordinator. The harness abandons
//! whatever step is waiting; the mining loop stops between iterations.

use crate::lifecycle::Shutdown;

/// Spawn a task that triggers `shutdown` on the first Ctrl-C.
pub fn listen_for_interrupt(shutdown: Shutdown) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, shutting down");
                shutdown.trigger();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for interrupt signal");
            }
        }
    });
}
