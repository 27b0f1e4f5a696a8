//! Wire contract shared by the relay service and its clients.

mod identity;
mod messages;
mod ttl;

pub use identity::Identity;
pub use messages::{Ciphertext, Data, ErrorBody, PutSecretRequest, RegisterRequest};
pub use ttl::{Ttl, TtlParseError};
