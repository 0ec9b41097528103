use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::shutdown::{ShutdownReceiver, ShutdownSender, wait_for_shutdown};

/// One pending signal is enough; later ones surface as `Lagged`.
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY)
}

/// Forward the first Ctrl+C (or SIGTERM on unix) into `shutdown_tx`.
///
/// The task ends after one signal, or quietly when a shutdown is broadcast by
/// someone else.
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let source = tokio::select! {
            () = wait_for_shutdown(&mut shutdown_rx) => return,
            _ = tokio::signal::ctrl_c() => "Interrupt",
            () = terminate() => "SIGTERM",
        };
        warn!("{} received, stopping the run", source);
        if shutdown_tx.send(()).is_err() {
            debug!("No run is listening for shutdown");
        }
    })
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            term.recv().await;
        }
        Err(err) => {
            warn!("Failed to register SIGTERM handler: {}", err);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn handler_does_not_echo_a_broadcast_shutdown() -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("Failed to build runtime: {}", err))?;
        runtime.block_on(async {
            let (shutdown_tx, mut run_rx) = shutdown_channel();
            let handle = setup_signal_shutdown_handler(&shutdown_tx);
            shutdown_tx
                .send(())
                .map_err(|err| format!("Failed to send shutdown: {}", err))?;

            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .map_err(|err| format!("Handler did not exit: {}", err))?
                .map_err(|err| format!("Handler join error: {}", err))?;

            if run_rx.try_recv().is_err() {
                return Err("Run should observe the shutdown".to_owned());
            }
            if run_rx.try_recv().is_ok() {
                return Err("Handler forwarded a second shutdown".to_owned());
            }
            Ok(())
        })
    }
}
