use crate::{config::ConfigError, serialize::SerializeError, types::NodeId};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Quiet no-ops (inserting a linked id, removing an unknown id) never
/// produce one of these; only conditions the caller cannot ignore do.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct an index-origin invariant violation.
    pub(crate) fn index_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Index,
            message.into(),
        )
    }

    /// Construct a snapshot-origin corruption error.
    pub(crate) fn snapshot_corruption(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Corruption,
            ErrorOrigin::Snapshot,
            message.into(),
        )
    }

    #[must_use]
    pub const fn is_empty_index(&self) -> bool {
        matches!(self.detail, Some(ErrorDetail::Index(IndexError::Empty)))
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Index(IndexError::IdSpaceExhausted { .. }))
        )
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Index(IndexError),

    #[error("{0}")]
    Serialize(SerializeError),

    #[error("{0}")]
    Config(ConfigError),
}

///
/// IndexError
///
/// The only hard failures of the list engine itself.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum IndexError {
    #[error("median of an empty index is undefined")]
    Empty,

    #[error("node id space exhausted after id {last}")]
    IdSpaceExhausted { last: NodeId },
}

impl IndexError {
    const fn class(&self) -> ErrorClass {
        match self {
            Self::Empty => ErrorClass::NotFound,
            Self::IdSpaceExhausted { .. } => ErrorClass::Internal,
        }
    }

    const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Empty => ErrorOrigin::Index,
            Self::IdSpaceExhausted { .. } => ErrorOrigin::Allocator,
        }
    }
}

impl From<IndexError> for InternalError {
    fn from(err: IndexError) -> Self {
        Self {
            class: err.class(),
            origin: err.origin(),
            message: err.to_string(),
            detail: Some(ErrorDetail::Index(err)),
        }
    }
}

impl From<SerializeError> for InternalError {
    fn from(err: SerializeError) -> Self {
        let class = match err {
            SerializeError::Serialize(_) => ErrorClass::Internal,
            SerializeError::Deserialize(_) => ErrorClass::Corruption,
            SerializeError::DeserializeSizeLimitExceeded { .. } => ErrorClass::Unsupported,
        };

        Self {
            class,
            origin: ErrorOrigin::Serialize,
            message: err.to_string(),
            detail: Some(ErrorDetail::Serialize(err)),
        }
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Config,
            message: err.to_string(),
            detail: Some(ErrorDetail::Config(err)),
        }
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Corruption,
    NotFound,
    Internal,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Allocator,
    Index,
    Snapshot,
    Serialize,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Allocator => "allocator",
            Self::Index => "index",
            Self::Snapshot => "snapshot",
            Self::Serialize => "serialize",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
