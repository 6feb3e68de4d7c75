use candid::CandidType;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use sortedlist_core::error::{
    ErrorClass, ErrorDetail, ErrorOrigin as CoreErrorOrigin, IndexError, InternalError,
};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match (&err.detail, err.class) {
            (Some(ErrorDetail::Index(IndexError::Empty)), _) => ErrorKind::Empty,
            (Some(ErrorDetail::Index(IndexError::IdSpaceExhausted { .. })), _) => {
                ErrorKind::Exhausted
            }
            (_, ErrorClass::Corruption | ErrorClass::InvariantViolation) => ErrorKind::Corrupt,
            (Some(ErrorDetail::Config(_)), _) | (_, ErrorClass::Unsupported) => ErrorKind::Invalid,
            _ => ErrorKind::Internal,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers and canister interfaces.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Median requested from an index with no linked records.
    Empty,

    /// No further ids can be issued.
    Exhausted,

    /// Persisted state failed to decode or broke a structural invariant.
    Corrupt,

    /// Rejected input: bad config, oversized payload.
    Invalid,

    /// The caller cannot remediate this.
    Internal,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers and canister interfaces.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Allocator,
    Index,
    Snapshot,
    Serialize,
    Config,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Allocator => Self::Allocator,
            CoreErrorOrigin::Index => Self::Index,
            CoreErrorOrigin::Snapshot => Self::Snapshot,
            CoreErrorOrigin::Serialize => Self::Serialize,
            CoreErrorOrigin::Config => Self::Config,
        }
    }
}

///
/// TESTS
///
