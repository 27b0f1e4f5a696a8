//! Mailbox write endpoint.
//!
//! The relay never inspects the payload. Whatever bytes arrive are stored
//! under the recipient's slot and replace anything already queued there.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use common::protocol::{ErrorBody, PutSecretRequest, Ttl};

use crate::store::StoreError;
use crate::ServiceState;

#[axum::debug_handler]
pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<PutSecretRequest>,
) -> Result<impl IntoResponse, PutSecretError> {
    let ttl = req.ttl.and_then(Ttl::expires_in);
    let envelope = req.data.into_bytes();

    tracing::debug!(recipient = %req.id, bytes = envelope.len(), "queueing envelope");
    state.mailbox().put(&req.id, &envelope, ttl).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum PutSecretError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for PutSecretError {
    fn into_response(self) -> Response {
        let PutSecretError::Store(err) = self;
        let status = match &err {
            StoreError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        tracing::error!(%err, "envelope write failed");

        (
            status,
            Json(ErrorBody {
                error: err.client_message().to_owned(),
            }),
        )
            .into_response()
    }
}
