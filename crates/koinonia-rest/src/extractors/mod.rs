//! Custom Axum extractors.
//!
//! Each wraps the stock Axum extractor and reports a malformed request in
//! the response envelope instead of Axum's plain-text rejection.

mod claims;
mod payload;

pub use claims::*;
pub use payload::*;
