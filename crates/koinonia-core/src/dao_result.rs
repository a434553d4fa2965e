//! DAO outcome types.
//!
//! Every DAO method returns a [`DaoResult`]. A failure always carries a
//! [`DaoErrorKind`] so services branch on the kind and never on message
//! text. [`ResultEnvelope`] is the serialized `{success, data, error}` shape.

use crate::KoinoniaError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message carried by a duplicate like.
pub const ALREADY_LIKED: &str = "Already liked";

/// Classification of a failed store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DaoErrorKind {
    /// The target row, or a row it references, does not exist.
    NotFound,
    /// A uniqueness constraint rejected the write.
    AlreadyExists,
    /// An ownership condition attached to the write did not hold.
    Forbidden,
    /// Any other failure reported by the store.
    Store,
    /// The store could not be reached at all.
    Unavailable,
}

/// A uniquely indexed user field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueKey {
    Email,
    Username,
}

/// A failed store operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DaoError {
    pub kind: DaoErrorKind,
    pub message: String,
    /// The unique field that rejected an `AlreadyExists` write, when known.
    pub key: Option<UniqueKey>,
}

impl DaoError {
    #[must_use]
    pub fn new(kind: DaoErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            key: None,
        }
    }

    /// `AlreadyExists` naming the field that clashed.
    #[must_use]
    pub fn duplicate(key: UniqueKey, message: impl Into<String>) -> Self {
        Self {
            key: Some(key),
            ..Self::already_exists(message)
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(DaoErrorKind::NotFound, message)
    }

    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(DaoErrorKind::AlreadyExists, message)
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(DaoErrorKind::Forbidden, message)
    }

    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(DaoErrorKind::Store, message)
    }

    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(DaoErrorKind::Unavailable, message)
    }

    /// Returns true if the failure has the given kind.
    #[must_use]
    pub fn is(&self, kind: DaoErrorKind) -> bool {
        self.kind == kind
    }

    /// Returns true if `key` was the field that clashed.
    #[must_use]
    pub fn is_duplicate(&self, key: UniqueKey) -> bool {
        self.kind == DaoErrorKind::AlreadyExists && self.key == Some(key)
    }
}

impl From<KoinoniaError> for DaoError {
    fn from(err: KoinoniaError) -> Self {
        let kind = match &err {
            KoinoniaError::NotFound { .. } => DaoErrorKind::NotFound,
            KoinoniaError::Conflict(_) => DaoErrorKind::AlreadyExists,
            KoinoniaError::Forbidden(_) => DaoErrorKind::Forbidden,
            KoinoniaError::Unavailable(_) => DaoErrorKind::Unavailable,
            _ => DaoErrorKind::Store,
        };
        Self::new(kind, err.to_string())
    }
}

/// Outcome of a single DAO call.
pub type DaoResult<T> = Result<T, DaoError>;

/// Serialized form of a [`DaoResult`].
///
/// `success == true` implies `data` is present and `error` is absent;
/// `success == false` implies `data` is `null` and `error` holds the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<DaoResult<T>> for ResultEnvelope<T> {
    fn from(result: DaoResult<T>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(err) => Self {
                success: false,
                data: None,
                error: Some(err.message),
            },
        }
    }
}
