use axum::routing::{get, post};
use axum::Router;

pub mod lookup;
pub mod register;

use crate::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/", post(register::handler))
        .route("/:id", get(lookup::handler))
}
