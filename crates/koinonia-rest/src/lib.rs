//! # Koinonia REST
//!
//! HTTP surface of the Koinonia backend, built on Axum. Handlers are thin:
//! they pull the caller's identity and the raw payload out of the request,
//! hand both to a service, and render the returned
//! [`HttpMessage`](koinonia_core::HttpMessage) as-is.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
