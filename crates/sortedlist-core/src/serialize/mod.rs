//! CBOR serialization for persisted index state.
//!
//! Format-level only: callers that decode untrusted bytes pass an explicit
//! size limit (`IndexConfig::max_snapshot_bytes` for snapshots).

mod cbor;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error as ThisError;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("deserialize size limit exceeded: {len} bytes (limit {max_bytes})")]
    DeserializeSizeLimitExceeded { len: usize, max_bytes: usize },
}

/// Serialize a value into CBOR bytes.
pub fn serialize<T>(ty: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    cbor::encode(ty)
}

/// Deserialize a value produced by [`serialize`], refusing payloads over `max_bytes`.
pub fn deserialize_bounded<T>(bytes: &[u8], max_bytes: usize) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    cbor::decode_bounded(bytes, max_bytes)
}

///
/// TESTS
///
