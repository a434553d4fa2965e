//! Password and secret hashing.

mod hasher;

pub use hasher::*;
