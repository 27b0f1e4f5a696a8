//! Identity registration endpoint.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use common::protocol::{Data, ErrorBody, RegisterRequest};

use crate::directory::DirectoryError;
use crate::store::StoreError;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, RegisterError> {
    let id = state.directory().register(&req.public_key, req.id).await?;

    tracing::info!(%id, "registered identity");
    Ok((StatusCode::OK, Json(Data { data: id })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        let RegisterError::Directory(err) = self;
        let (status, message) = match &err {
            DirectoryError::InvalidKey(_)
            | DirectoryError::InvalidIdentity(_)
            | DirectoryError::IdentityNotAccepted
            | DirectoryError::IdentityRequired => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            DirectoryError::IdentityTaken(_) => (StatusCode::CONFLICT, err.to_string()),
            DirectoryError::Store(store_err) => {
                let status = match store_err {
                    StoreError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, store_err.client_message().to_owned())
            }
            DirectoryError::NotFound(_) | DirectoryError::CorruptRecord(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        if status.is_server_error() {
            tracing::error!(%err, "registration failed");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
