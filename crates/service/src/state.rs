use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::directory::{Directory, IdentityMode};
use crate::mailbox::Mailbox;
use crate::store::{MemoryStore, RedbStore, Store, StoreError};

/// Shared handles for everything the HTTP layer needs.
#[derive(Clone)]
pub struct ServiceState {
    store: Arc<dyn Store>,
    directory: Arc<Directory>,
    mailbox: Arc<Mailbox>,
}

impl ServiceState {
    /// Wire the directory and mailbox up on top of `store`.
    pub fn new(store: Arc<dyn Store>, mode: IdentityMode) -> Self {
        Self {
            directory: Arc::new(Directory::new(store.clone(), mode)),
            mailbox: Arc::new(Mailbox::new(store.clone())),
            store,
        }
    }

    /// Build state from config, on disk when a database path is set and
    /// in memory otherwise.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, StateError> {
        let store: Arc<dyn Store> = match &config.db_path {
            Some(path) => Arc::new(RedbStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(Self::new(store, config.identity_mode))
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
}
