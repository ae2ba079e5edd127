//! Codec trait and implementations for serializing session records and
//! wire messages.
//!
//! A codec converts between Rust types and raw bytes. Consumers (the file
//! store, test fixtures) don't care HOW records are serialized — they go
//! through the [`Codec`] trait and implementations can be swapped without
//! touching the call sites.
//!
//! Currently only [`JsonCodec`] is provided: human-readable, easy to
//! inspect on disk when debugging a stuck session.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust types to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` so a codec can live inside long-lived async
/// tasks and be shared across threads.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed,
    /// truncated, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature flag (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Role, User, UserId};

    #[test]
    fn test_json_codec_round_trips_a_user() {
        let codec = JsonCodec;
        let user = User {
            id: UserId(1),
            username: "admin.general".into(),
            full_name: "General Administrator".into(),
            role: Role::AdminUser,
            area: "Administration".into(),
        };

        let bytes = codec.encode(&user).unwrap();
        let decoded: User = codec.decode(&bytes).unwrap();
        assert_eq!(user, decoded);
    }

    #[test]
    fn test_json_codec_decode_rejects_garbage() {
        let codec = JsonCodec;
        let result: Result<User, _> = codec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
