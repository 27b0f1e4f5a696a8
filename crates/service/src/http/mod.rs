use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use tokio::sync::watch;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;

pub mod health;
pub mod secrets;
pub mod users;

use common::protocol::ErrorBody;

use crate::ServiceState;

const STATUS_PREFIX: &str = "/_status";

/// Largest request body accepted. A PEM key or a single base64 envelope
/// fits well under this.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Assemble the full relay router.
pub fn router(state: ServiceState) -> Router {
    Router::new()
        .nest("/users", users::router())
        .nest("/secrets", secrets::router())
        .nest(STATUS_PREFIX, health::router())
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not found".to_owned(),
        }),
    )
}

/// Serve the relay until the shutdown signal flips.
pub async fn serve(
    listen_addr: SocketAddr,
    log_level: tracing::Level,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let router = router(state).layer(trace_layer);

    tracing::info!(addr = ?listen_addr, "relay listening");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("http server io error: {0}")]
    Io(#[from] std::io::Error),
}
