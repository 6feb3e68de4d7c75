use crate::serialize::SerializeError;
use serde::{Serialize, de::DeserializeOwned};
use std::panic::{AssertUnwindSafe, catch_unwind};

pub(super) fn encode<T>(value: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    serde_cbor::to_vec(value).map_err(|err| SerializeError::Serialize(err.to_string()))
}

/// Decode at most `max_bytes` of CBOR.
///
/// The length is checked before the decoder sees any input, and a panic
/// inside the decoder comes back as `SerializeError::Deserialize`.
pub(super) fn decode_bounded<T>(bytes: &[u8], max_bytes: usize) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    if bytes.len() > max_bytes {
        return Err(SerializeError::DeserializeSizeLimitExceeded {
            len: bytes.len(),
            max_bytes,
        });
    }

    catch_unwind(AssertUnwindSafe(|| serde_cbor::from_slice::<T>(bytes)))
        .map_err(|_| SerializeError::Deserialize("decoder panicked".into()))?
        .map_err(|err| SerializeError::Deserialize(err.to_string()))
}
