//! Client-side protocol flows: register, seal and queue, collect and open.
//!
//! Everything cryptographic happens here or deeper. By the time bytes
//! reach the API layer they are already sealed.

use std::path::PathBuf;

use common::crypto::{
    DecryptError, EncryptError, KeyError, KeyStrength, PublicKey, SecretKey, MAX_PLAINTEXT_LEN,
};
use common::protocol::{Identity, PutSecretRequest, Ttl};

use crate::api::{ApiClient, ApiError};
use crate::state::{ClientConfig, ClientState, StateError};

/// Generate a key pair, register the public half with the relay, and
/// persist both halves of the result locally.
///
/// Checks for an existing state directory before generating anything, so
/// a failed run never burns the identity already on disk.
pub async fn register(
    api: &ApiClient,
    state_dir: Option<PathBuf>,
    strength: KeyStrength,
    requested_id: Option<Identity>,
) -> Result<ClientState, RegisterError> {
    if ClientState::exists(state_dir.clone())? {
        return Err(RegisterError::State(StateError::AlreadyInitialized));
    }

    let key = SecretKey::generate(strength)?;
    let public_pem = key.public_key().to_pem()?;

    let identity = api.register(&public_pem, requested_id).await?;

    let config = ClientConfig {
        identity,
        server: api.base_url().clone(),
    };
    let state = ClientState::init(state_dir, &key, config)?;

    Ok(state)
}

/// Seal `plaintext` for `recipient` and queue it on the relay.
///
/// The recipient's key is fetched fresh on every send. Plaintext that
/// cannot fit any supported key is rejected before touching the network.
pub async fn send(
    api: &ApiClient,
    recipient: &Identity,
    plaintext: &[u8],
    ttl: Option<Ttl>,
) -> Result<(), SendError> {
    if plaintext.len() > MAX_PLAINTEXT_LEN {
        return Err(SendError::Encrypt(EncryptError::PlaintextTooLarge {
            len: plaintext.len(),
            max: MAX_PLAINTEXT_LEN,
        }));
    }

    let pem = api.fetch_public_key(recipient).await?;
    let key = PublicKey::from_pem(&pem)?;
    let sealed = key.encrypt(plaintext)?;

    let request = PutSecretRequest {
        id: recipient.clone(),
        data: sealed.into(),
        ttl,
    };
    api.put_secret(&request).await?;

    Ok(())
}

/// Collect the envelope waiting for this client, if any, and open it.
pub async fn receive(
    api: &ApiClient,
    state: &ClientState,
) -> Result<Option<Vec<u8>>, ReceiveError> {
    let key = state.load_key()?;

    let envelope = match api.fetch_secret(&state.config.identity).await? {
        Some(envelope) => envelope,
        None => return Ok(None),
    };

    let plaintext = key.decrypt(envelope.as_bytes())?;
    Ok(Some(plaintext))
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("key generation failed: {0}")]
    Key(#[from] KeyError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    State(#[from] StateError),
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("recipient key rejected: {0}")]
    Key(#[from] KeyError),
    #[error(transparent)]
    Encrypt(#[from] EncryptError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, thiserror::Error)]
pub enum ReceiveError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not open envelope: {0}")]
    Decrypt(#[from] DecryptError),
}
