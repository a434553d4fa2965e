//! Result type aliases for Koinonia.

use crate::KoinoniaError;

/// A specialized `Result` type for infrastructure operations.
pub type KoinoniaResult<T> = Result<T, KoinoniaError>;
