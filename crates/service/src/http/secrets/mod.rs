use axum::routing::{get, post};
use axum::Router;

pub mod fetch;
pub mod put;

use crate::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/", post(put::handler))
        .route("/:id", get(fetch::handler))
}
