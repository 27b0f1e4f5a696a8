//! Shared building blocks for the deaddrop relay: the RSA envelope codec
//! used by clients and the wire types exchanged with the relay.
//!
//! Nothing in this crate touches the network. The service consumes the
//! protocol types, clients consume both halves.

pub mod crypto;
pub mod protocol;

pub mod prelude {
    pub use crate::crypto::{KeyStrength, PublicKey, SecretKey};
    pub use crate::protocol::{Ciphertext, Identity, Ttl};
}
