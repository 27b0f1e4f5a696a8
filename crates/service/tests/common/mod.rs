//! Shared test utilities for relay HTTP tests
#![allow(dead_code)]

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use common::crypto::{KeyStrength, SecretKey};
use deaddrop_service::store::{MemoryStore, Store, StoreError};
use deaddrop_service::{http, IdentityMode, ServiceState};

/// Spin up a relay on an ephemeral port backed by a fresh in-memory store.
pub async fn spawn_relay() -> String {
    spawn_relay_with(Arc::new(MemoryStore::new()), IdentityMode::ServerAssigned).await
}

/// Spin up a relay over an arbitrary store and identity mode. Returns the
/// base URL to aim requests at.
pub async fn spawn_relay_with(store: Arc<dyn Store>, mode: IdentityMode) -> String {
    let state = ServiceState::new(store, mode);
    let router = http::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// One shared key pair so tests do not each pay for RSA generation.
pub fn test_key() -> &'static SecretKey {
    static KEY: OnceLock<SecretKey> = OnceLock::new();
    KEY.get_or_init(|| SecretKey::generate(KeyStrength::Rsa1024).unwrap())
}

pub fn test_public_key_pem() -> String {
    test_key().public_key().to_pem().unwrap()
}

/// Register the shared test key and return the assigned identity.
pub async fn register_identity(client: &reqwest::Client, base: &str) -> String {
    let res = client
        .post(format!("{}/users", base))
        .json(&serde_json::json!({ "public_key": test_public_key_pem() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: serde_json::Value = res.json().await.unwrap();
    body["data"].as_str().unwrap().to_owned()
}

/// The backend text `FailingStore` fails with. Looks like what a broken
/// database adapter would report; must never show up in a response body.
pub const OUTAGE_DETAIL: &str = "io error at /var/db/relay.redb: permission denied";

/// A store that refuses every operation with backend detail attached.
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
    fn refuse<T>() -> Result<T, StoreError> {
        Err(StoreError::Unavailable(OUTAGE_DETAIL.to_owned()))
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn put(
        &self,
        _key: &str,
        _value: &[u8],
        _ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        Self::refuse()
    }

    async fn put_if_absent(
        &self,
        _key: &str,
        _value: &[u8],
        _ttl: Option<Duration>,
    ) -> Result<bool, StoreError> {
        Self::refuse()
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Self::refuse()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Self::refuse()
    }
}

/// A store whose every operation overruns its deadline.
#[derive(Debug, Default)]
pub struct TimeoutStore;

#[async_trait]
impl Store for TimeoutStore {
    async fn put(
        &self,
        _key: &str,
        _value: &[u8],
        _ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        Err(StoreError::Timeout)
    }

    async fn put_if_absent(
        &self,
        _key: &str,
        _value: &[u8],
        _ttl: Option<Duration>,
    ) -> Result<bool, StoreError> {
        Err(StoreError::Timeout)
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Timeout)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Timeout)
    }
}
