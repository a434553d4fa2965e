//! Unified error type for infrastructure paths.
//!
//! Request handling never lets this type reach the client directly: DAOs
//! fold it into a [`DaoError`](crate::DaoError) and services turn that into
//! an [`HttpMessage`](crate::HttpMessage). Startup, configuration, token and
//! hashing code return it as-is.

use thiserror::Error;

/// Unified error type for all layers of Koinonia.
#[derive(Error, Debug)]
pub enum KoinoniaError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Authentication/Authorization Errors ============
    /// Forbidden access
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid token
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token expired
    #[error("Token expired")]
    TokenExpired,

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// The store could not be reached (pool exhausted, closed, or I/O failure).
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for KoinoniaError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                // 23505: unique_violation, 23503: foreign_key_violation
                if db_err.is_unique_violation() {
                    return Self::Conflict(db_err.message().to_string());
                }
                if db_err.is_foreign_key_violation() {
                    return Self::NotFound {
                        resource_type: "referenced_row",
                        id: db_err.constraint().unwrap_or("unknown").to_string(),
                    };
                }
                Self::Database(err.to_string())
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Unavailable(err.to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(
            KoinoniaError::from(sqlx::Error::PoolTimedOut),
            KoinoniaError::Unavailable(_)
        ));
        assert!(matches!(
            KoinoniaError::from(sqlx::Error::PoolClosed),
            KoinoniaError::Unavailable(_)
        ));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = KoinoniaError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, KoinoniaError::NotFound { resource_type: "database_row", .. }));
    }

    #[test]
    fn test_error_display() {
        let err = KoinoniaError::NotFound {
            resource_type: "Post",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Resource not found: Post with id abc");
        assert_eq!(KoinoniaError::TokenExpired.to_string(), "Token expired");
    }
}
