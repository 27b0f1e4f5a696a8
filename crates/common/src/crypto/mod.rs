//! RSA-OAEP key handling for sealed envelopes.
//!
//! All sealing and opening happens on clients. The relay only ever sees
//! PEM key records and opaque ciphertext, so this module is the entire
//! cryptographic surface of the protocol.

mod keys;

pub use keys::{
    DecryptError, EncryptError, KeyError, KeyStrength, PublicKey, SecretKey, MAX_PLAINTEXT_LEN,
};
