use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::ServiceState;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

pub fn router() -> Router<ServiceState> {
    Router::new().route("/healthz", get(healthz))
}

/// Liveness plus a store round trip. Load balancers poll this before
/// routing traffic to a fresh instance.
async fn healthz(State(state): State<ServiceState>) -> (StatusCode, &'static str) {
    match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, state.store().ping()).await {
        Ok(Ok(())) => (StatusCode::OK, "ok"),
        Ok(Err(err)) => {
            tracing::warn!(?err, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
        }
        Err(_) => {
            tracing::warn!("health check timed out");
            (StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
        }
    }
}
