//! # Koinonia Service
//!
//! Business logic for the Koinonia backend. Every operation runs the same
//! pipeline:
//!
//! 1. validate the raw request; a failure is 422 `VALIDATION_ERROR` and no
//!    DAO is called;
//! 2. call the DAO(s);
//! 3. map the [`DaoErrorKind`](koinonia_core::DaoErrorKind) to a status and
//!    error tag, falling back to 422 with the operation's tag, or 500 when
//!    the store is unreachable.
//!
//! Operations return an [`HttpMessage`](koinonia_core::HttpMessage), never
//! a `Result`: every outcome is already an HTTP answer.

pub mod auth_service;
pub mod comment_service;
pub mod dto;
pub mod r#impl;
pub mod interaction_service;
pub mod post_service;
pub mod user_service;

pub use auth_service::*;
pub use comment_service::*;
pub use dto::*;
pub use interaction_service::*;
pub use post_service::*;
pub use r#impl::*;
pub use user_service::*;
