//! # Koinonia Server Library
//!
//! Wiring for the server binary: store selection, service construction
//! and process startup helpers.

pub mod di;
pub mod startup;
