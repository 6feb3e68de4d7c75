use candid::{
    CandidType, Nat as WrappedNat,
    types::{Serializer, Type, TypeInner},
};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// Nat256Error
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum Nat256Error {
    #[error("value needs {bits} bits, exceeds 256")]
    Overflow { bits: u64 },

    #[error("invalid natural literal: {0}")]
    Parse(String),
}

///
/// Nat256
///
/// Unsigned 256-bit sort key. Backed by an arbitrary-precision natural so
/// intermediate sums (median of two maxima) never wrap; every constructor
/// rejects values wider than 256 bits.
///
/// Candid and serde share one wire layout: 32 big-endian bytes (`blob`).
///

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Nat256(WrappedNat);

impl Nat256 {
    pub const BITS: u64 = 256;
    pub const BYTES: usize = 32;

    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Largest representable value, `2^256 - 1`.
    #[must_use]
    pub fn max() -> Self {
        Self::from_be_bytes([u8::MAX; Self::BYTES])
    }

    #[must_use]
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(WrappedNat(BigUint::from_bytes_be(&bytes)))
    }

    /// Fixed-width big-endian encoding, left padded with zeros.
    #[must_use]
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let raw = self.0.0.to_bytes_be();
        let mut out = [0u8; Self::BYTES];
        // zero encodes as a single 0x00 byte, which still fits the tail
        out[Self::BYTES - raw.len()..].copy_from_slice(&raw);

        out
    }

    #[must_use]
    pub fn to_u128(&self) -> Option<u128> {
        u128::try_from(&self.0.0).ok()
    }

    #[must_use]
    pub fn as_biguint(&self) -> &BigUint {
        &self.0.0
    }

    /// Arithmetic mean of two values, truncated toward zero.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        let sum = &self.0.0 + &other.0.0;

        Self(WrappedNat(sum / 2u32))
    }
}

impl fmt::Display for Nat256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.0)
    }
}

impl From<u64> for Nat256 {
    fn from(n: u64) -> Self {
        Self(WrappedNat(BigUint::from(n)))
    }
}

impl From<u128> for Nat256 {
    fn from(n: u128) -> Self {
        Self(WrappedNat(BigUint::from(n)))
    }
}

impl TryFrom<BigUint> for Nat256 {
    type Error = Nat256Error;

    fn try_from(n: BigUint) -> Result<Self, Self::Error> {
        let bits = n.bits();
        if bits > Self::BITS {
            return Err(Nat256Error::Overflow { bits });
        }

        Ok(Self(WrappedNat(n)))
    }
}

impl TryFrom<WrappedNat> for Nat256 {
    type Error = Nat256Error;

    fn try_from(n: WrappedNat) -> Result<Self, Self::Error> {
        Self::try_from(n.0)
    }
}

impl From<Nat256> for WrappedNat {
    fn from(n: Nat256) -> Self {
        n.0
    }
}

impl FromStr for Nat256 {
    type Err = Nat256Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = BigUint::from_str(s.trim()).map_err(|err| Nat256Error::Parse(err.to_string()))?;

        Self::try_from(n)
    }
}

impl CandidType for Nat256 {
    fn _ty() -> Type {
        TypeInner::Vec(TypeInner::Nat8.into()).into()
    }

    fn idl_serialize<S>(&self, serializer: S) -> Result<(), S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_blob(&self.to_be_bytes())
    }
}

impl Serialize for Nat256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.to_be_bytes())
    }
}

impl<'de> Deserialize<'de> for Nat256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_bytes(Nat256Visitor)
    }
}

struct Nat256Visitor;

impl<'de> serde::de::Visitor<'de> for Nat256Visitor {
    type Value = Nat256;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} big-endian bytes", Nat256::BYTES)
    }

    fn visit_bytes<E>(self, bytes: &[u8]) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| E::invalid_length(bytes.len(), &self))?;

        Ok(Nat256::from_be_bytes(arr))
    }

    // self-describing formats without a byte-string type hand over a sequence
    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut arr = [0u8; 32];
        for (i, byte) in arr.iter_mut().enumerate() {
            *byte = seq
                .next_element()?
                .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
        }
        if seq.next_element::<u8>()?.is_some() {
            return Err(serde::de::Error::invalid_length(Nat256::BYTES + 1, &self));
        }

        Ok(Nat256::from_be_bytes(arr))
    }
}

///
/// TESTS
///
