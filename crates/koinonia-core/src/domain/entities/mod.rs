//! Domain entities.

mod comment;
mod interaction;
mod like;
mod post;
mod user;

pub use comment::*;
pub use interaction::*;
pub use like::*;
pub use post::*;
pub use user::*;
