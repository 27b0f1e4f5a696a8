use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::identity::Identity;
use super::ttl::Ttl;

/// Sealed envelope bytes, carried over the wire as standard base64.
///
/// The relay stores and returns these byte for byte. Only the recipient
/// can do anything with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Ciphertext {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Serialize for Ciphertext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Ciphertext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        BASE64
            .decode(text.as_bytes())
            .map(Self)
            .map_err(de::Error::custom)
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// PEM encoding of the key other participants seal envelopes with.
    pub public_key: String,
    /// Requested identity. Only honored by relays running in
    /// client-chosen assignment mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identity>,
}

/// Body of `POST /secrets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutSecretRequest {
    /// Recipient whose slot the envelope lands in.
    pub id: Identity,
    pub data: Ciphertext,
    /// Retention window. Absent or zero keeps the envelope until it is
    /// overwritten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Ttl>,
}

/// Envelope every successful JSON response is wrapped in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

/// Envelope for non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
