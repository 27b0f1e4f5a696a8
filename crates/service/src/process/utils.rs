use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;

const REQUEST_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Spawns a task that turns SIGINT and SIGTERM into a flip of the
/// returned watch channel.
///
/// SIGINT flips it immediately. SIGTERM waits out the grace period first
/// so a load balancer has time to stop routing here. The sender is handed
/// back for programmatic shutdown.
pub fn shutdown_watcher() -> (watch::Sender<()>, watch::Receiver<()>) {
    let mut sigint = signal(SignalKind::interrupt()).unwrap();
    let mut sigterm = signal(SignalKind::terminate()).unwrap();

    let (tx, rx) = watch::channel(());
    let signal_tx = tx.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => {
                tracing::debug!("shutting down immediately on SIGINT");
            }
            _ = sigterm.recv() => {
                tokio::time::sleep(REQUEST_GRACE_PERIOD).await;
                tracing::debug!("draining requests before shutdown on SIGTERM");
            }
        }

        let _ = signal_tx.send(());
    });

    (tx, rx)
}

/// Registers a panic hook that logs panics using the `tracing` crate
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| match panic.location() {
        Some(loc) => {
            tracing::error!(
                message = %panic,
                panic.file = loc.file(),
                panic.line = loc.line(),
                panic.column = loc.column(),
            );
        }
        None => tracing::error!(message = %panic),
    }));
}
