//! Mailbox read endpoint.
//!
//! An empty slot is not an error. Clients poll this route, so a miss
//! answers 204 and a hit returns the queued envelope as base64.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use common::protocol::{Ciphertext, Data, ErrorBody, Identity};

use crate::store::StoreError;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<Identity>,
) -> Result<impl IntoResponse, FetchSecretError> {
    let response = match state.mailbox().get(&id).await? {
        Some(envelope) => (
            StatusCode::OK,
            Json(Data {
                data: Ciphertext::new(envelope),
            }),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };

    Ok(response)
}

#[derive(Debug, thiserror::Error)]
pub enum FetchSecretError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for FetchSecretError {
    fn into_response(self) -> Response {
        let FetchSecretError::Store(err) = self;
        let status = match &err {
            StoreError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        tracing::error!(%err, "envelope read failed");

        (
            status,
            Json(ErrorBody {
                error: err.client_message().to_owned(),
            }),
        )
            .into_response()
    }
}
