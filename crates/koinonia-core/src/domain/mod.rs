//! Domain entities and value objects.
//!
//! Entities are plain records owned by the store; the application holds
//! them only for the duration of one request.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
