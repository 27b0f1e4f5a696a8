//! Thin typed wrapper over the relay's HTTP API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use common::protocol::{Ciphertext, Data, ErrorBody, Identity, PutSecretRequest, RegisterRequest};

/// Ceiling on any single request, connect included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    /// Register a public key, returning the identity the relay filed it
    /// under.
    pub async fn register(
        &self,
        public_key_pem: &str,
        id: Option<Identity>,
    ) -> Result<Identity, ApiError> {
        let url = self.remote.join("users")?;
        let request = RegisterRequest {
            public_key: public_key_pem.to_owned(),
            id,
        };

        let response = self.client.post(url).json(&request).send().await?;
        Self::parse_data(response).await
    }

    /// PEM encoding of the key registered under `id`.
    pub async fn fetch_public_key(&self, id: &Identity) -> Result<String, ApiError> {
        let url = self.remote.join(&format!("users/{}", id))?;
        let response = self.client.get(url).send().await?;
        Self::parse_data(response).await
    }

    /// Queue a sealed envelope on the relay.
    pub async fn put_secret(&self, request: &PutSecretRequest) -> Result<(), ApiError> {
        let url = self.remote.join("secrets")?;
        let response = self.client.post(url).json(request).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::status_error(response).await)
        }
    }

    /// The envelope queued for `id`. `None` when the slot is empty.
    pub async fn fetch_secret(&self, id: &Identity) -> Result<Option<Ciphertext>, ApiError> {
        let url = self.remote.join(&format!("secrets/{}", id))?;
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if response.status().is_success() {
            let body: Data<Ciphertext> = response.json().await?;
            return Ok(Some(body.data));
        }
        Err(Self::status_error(response).await)
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    async fn parse_data<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if response.status().is_success() {
            let body: Data<T> = response.json().await?;
            Ok(body.data)
        } else {
            Err(Self::status_error(response).await)
        }
    }

    /// Pull the relay's error message out of a non-2xx response, falling
    /// back to the raw body when it is not the usual JSON envelope.
    async fn status_error(response: Response) -> ApiError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);

        ApiError::HttpStatus(status, message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,
    #[error("HTTP request failed: {0}")]
    Reqwest(reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Reqwest(err)
        }
    }
}
