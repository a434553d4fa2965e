//! Folding store errors into [`DaoError`].

use koinonia_core::{DaoError, DaoErrorKind, KoinoniaError};
use tracing::error;

/// Message returned whenever the store cannot be reached.
pub(crate) const UNAVAILABLE: &str = "Database unavailable";

/// Logs a failed store call and classifies it.
///
/// `operation` reads as a verb phrase ("create a post") and ends up in the
/// generic message. Unique and foreign-key violations keep their kind so
/// callers can attach a domain message.
pub(crate) fn store_error(operation: &'static str, err: sqlx::Error) -> DaoError {
    let err = KoinoniaError::from(err);
    error!(operation, error = %err, "Store operation failed");

    match DaoError::from(err).kind {
        DaoErrorKind::Unavailable => DaoError::unavailable(UNAVAILABLE),
        kind => DaoError::new(kind, format!("Failed to {operation}.")),
    }
}

/// Name of the constraint or unique index a write violated, if any.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db_err| db_err.constraint())
        .map(str::to_owned)
}

/// Replaces the message of a failure of the given kind.
pub(crate) fn relabel(err: DaoError, kind: DaoErrorKind, message: &str) -> DaoError {
    if err.is(kind) {
        DaoError::new(kind, message)
    } else {
        err
    }
}
