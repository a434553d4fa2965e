//! # Koinonia Config
//!
//! Layered configuration: TOML files, then `.env`, then `KOINONIA__*`
//! environment variables. The result is validated before startup continues.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
