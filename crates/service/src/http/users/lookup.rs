//! Public key lookup endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use common::protocol::{Data, ErrorBody, Identity};

use crate::directory::DirectoryError;
use crate::store::StoreError;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<Identity>,
) -> Result<impl IntoResponse, LookupError> {
    let pem = state.directory().lookup(&id).await?;

    Ok((StatusCode::OK, Json(Data { data: pem })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let LookupError::Directory(err) = self;
        let (status, message) = match &err {
            DirectoryError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
            DirectoryError::Store(store_err) => {
                let status = match store_err {
                    StoreError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, store_err.client_message().to_owned())
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(%err, "key lookup failed");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
