use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use common::crypto::{KeyError, PublicKey};
use common::protocol::Identity;

use crate::store::{Store, StoreError};

const KEY_PREFIX: &str = "user:";
const MAX_IDENTITY_LEN: usize = 128;

/// How the relay hands out identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityMode {
    /// The relay mints a fresh identity for every registration.
    #[default]
    ServerAssigned,
    /// Callers bring their own identity token.
    ClientChosen,
}

impl FromStr for IdentityMode {
    type Err = ParseIdentityModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server-assigned" => Ok(Self::ServerAssigned),
            "client-chosen" => Ok(Self::ClientChosen),
            other => Err(ParseIdentityModeError(other.to_owned())),
        }
    }
}

impl fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerAssigned => f.write_str("server-assigned"),
            Self::ClientChosen => f.write_str("client-chosen"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown identity mode {0:?}, expected \"server-assigned\" or \"client-chosen\"")]
pub struct ParseIdentityModeError(String);

/// The public key directory: identity to PEM key record.
///
/// Records never expire. Once an identity is taken it keeps its key; a
/// participant who wants a new key registers again and gets a new
/// identity (or, in client-chosen mode, picks an unused one).
pub struct Directory {
    store: Arc<dyn Store>,
    mode: IdentityMode,
}

impl Directory {
    pub fn new(store: Arc<dyn Store>, mode: IdentityMode) -> Self {
        Self { store, mode }
    }

    pub fn mode(&self) -> IdentityMode {
        self.mode
    }

    /// Validate and record a public key, returning the identity it is
    /// now reachable under.
    ///
    /// The key must parse as RSA before anything is stored, so every
    /// record handed out by `lookup` is usable for sealing.
    pub async fn register(
        &self,
        public_key_pem: &str,
        requested: Option<Identity>,
    ) -> Result<Identity, DirectoryError> {
        PublicKey::from_pem(public_key_pem)?;

        let id = match self.mode {
            IdentityMode::ServerAssigned => {
                if requested.is_some() {
                    return Err(DirectoryError::IdentityNotAccepted);
                }
                Identity::random()
            }
            IdentityMode::ClientChosen => {
                let id = requested.ok_or(DirectoryError::IdentityRequired)?;
                validate_token(&id)?;
                id
            }
        };

        // The claim is atomic in the store; a recorded key is never
        // replaced, even by a racing duplicate registration.
        let claimed = self
            .store
            .put_if_absent(&record_key(&id), public_key_pem.as_bytes(), None)
            .await?;
        if !claimed {
            return Err(DirectoryError::IdentityTaken(id));
        }
        Ok(id)
    }

    /// The PEM key record registered under `id`.
    pub async fn lookup(&self, id: &Identity) -> Result<String, DirectoryError> {
        let record = self
            .store
            .get(&record_key(id))
            .await?
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))?;
        String::from_utf8(record).map_err(|_| DirectoryError::CorruptRecord(id.clone()))
    }
}

fn record_key(id: &Identity) -> String {
    format!("{KEY_PREFIX}{id}")
}

fn validate_token(id: &Identity) -> Result<(), DirectoryError> {
    let token = id.as_str();
    let len_ok = (1..=MAX_IDENTITY_LEN).contains(&token.len());
    let chars_ok = token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if len_ok && chars_ok {
        Ok(())
    } else {
        Err(DirectoryError::InvalidIdentity(id.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("no key registered for identity {0}")]
    NotFound(Identity),
    #[error("identity {0} is already taken")]
    IdentityTaken(Identity),
    #[error("this relay assigns identities, leave the requested id out")]
    IdentityNotAccepted,
    #[error("this relay requires a client-chosen id")]
    IdentityRequired,
    #[error("invalid identity {0}: expected 1-128 characters from [A-Za-z0-9._-]")]
    InvalidIdentity(Identity),
    #[error("key record for identity {0} is not valid utf-8")]
    CorruptRecord(Identity),
    #[error("rejected public key: {0}")]
    InvalidKey(#[from] KeyError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
