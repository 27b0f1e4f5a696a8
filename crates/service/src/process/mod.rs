pub mod utils;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::http::{self, HttpServerError};
use crate::state::StateError;
use crate::store::StoreError;
use crate::{ServiceConfig, ServiceState};

/// Initialize logging and the panic handler.
/// Returns a guard that must be kept alive for the duration of the program.
pub fn init_logging(config: &ServiceConfig) -> tracing_appender::non_blocking::WorkerGuard {
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

    let env_filter = EnvFilter::builder()
        .with_default_directive(config.log_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stdout_layer).init();

    utils::register_panic_logger();

    stdout_guard
}

/// Run the relay until a shutdown signal arrives.
///
/// Bails out before binding if the backing store cannot answer a ping.
pub async fn run(config: &ServiceConfig) -> Result<(), ProcessError> {
    let state = ServiceState::from_config(config)?;
    state.store().ping().await?;

    tracing::info!(mode = %config.identity_mode, "store reachable");

    let (_shutdown_tx, shutdown_rx) = utils::shutdown_watcher();

    http::serve(config.listen_addr, config.log_level, state, shutdown_rx).await?;

    tracing::info!("relay shutdown complete");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("store unreachable at startup: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Http(#[from] HttpServerError),
}
