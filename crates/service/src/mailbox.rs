use std::sync::Arc;
use std::time::Duration;

use common::protocol::Identity;

use crate::store::{Store, StoreError};

const SLOT_PREFIX: &str = "data:";

/// One pending envelope per recipient.
///
/// A new envelope replaces whatever was queued, and reading leaves the
/// slot in place. The payload is opaque; the mailbox never looks inside.
pub struct Mailbox {
    store: Arc<dyn Store>,
}

impl Mailbox {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Queue `envelope` for `recipient`, replacing any earlier one.
    pub async fn put(
        &self,
        recipient: &Identity,
        envelope: &[u8],
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        self.store.put(&slot_key(recipient), envelope, ttl).await
    }

    /// The queued envelope for `recipient`, if one is there and unexpired.
    pub async fn get(&self, recipient: &Identity) -> Result<Option<Vec<u8>>, StoreError> {
        self.store.get(&slot_key(recipient)).await
    }
}

fn slot_key(recipient: &Identity) -> String {
    format!("{SLOT_PREFIX}{recipient}")
}
