//! Persistence behind the relay.
//!
//! Adapters store opaque bytes and never parse them. Keys are namespaced
//! by the caller (the directory and the mailbox use different prefixes)
//! so one store can back both.

use std::time::Duration;

use async_trait::async_trait;

mod memory;
mod redb;

pub use memory::MemoryStore;
pub use redb::RedbStore;

/// Ceiling on any single storage operation.
pub(crate) const OP_TIMEOUT: Duration = Duration::from_secs(2);

#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Store `value` under `key`, replacing whatever was there.
    ///
    /// A `ttl` of `None` keeps the value until it is overwritten.
    async fn put(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), StoreError>;

    /// Store `value` under `key` only if the key holds nothing live,
    /// returning whether the write happened.
    ///
    /// The check and the write are atomic; expired values count as
    /// absent. A `false` return leaves the existing value untouched.
    async fn put_if_absent(
        &self,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<bool, StoreError>;

    /// Fetch the value under `key`. `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Cheap liveness check.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out")]
    Timeout,
}

impl StoreError {
    /// Client-facing wording. The backend detail in `Unavailable` is for
    /// server logs only and never goes over the wire.
    pub fn client_message(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => "store unavailable",
            StoreError::Timeout => "store operation timed out",
        }
    }
}
