//! # Koinonia Core
//!
//! Core types shared by every layer of the Koinonia backend: typed ids,
//! domain entities, the DAO result envelope, the HTTP response envelope
//! and the unified error type.

pub mod dao_result;
pub mod domain;
pub mod error;
pub mod http_message;
pub mod id;
pub mod pagination;
pub mod result;
pub mod validation;

pub use dao_result::*;
pub use domain::*;
pub use error::*;
pub use http_message::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use validation::*;
