//! DAO (Data Access Object) layer.
//!
//! One trait per entity, one store operation per method. Every method
//! returns a [`DaoResult`](koinonia_core::DaoResult): store failures are
//! logged once and folded into a typed [`DaoError`](koinonia_core::DaoError).
//!
//! ```text
//! Service → DAO (trait) → PgXxxDaoImpl | MemoryStore → store
//! ```

pub mod comment_dao;
mod error;
pub mod r#impl;
pub mod interaction_dao;
pub mod like_dao;
pub mod post_dao;
pub mod user_dao;

pub use comment_dao::CommentDao;
pub use interaction_dao::InteractionDao;
pub use like_dao::LikeDao;
pub use post_dao::PostDao;
pub use user_dao::UserDao;

#[cfg(any(test, feature = "mocks"))]
pub use comment_dao::MockCommentDao;
#[cfg(any(test, feature = "mocks"))]
pub use interaction_dao::MockInteractionDao;
#[cfg(any(test, feature = "mocks"))]
pub use like_dao::MockLikeDao;
#[cfg(any(test, feature = "mocks"))]
pub use post_dao::MockPostDao;
#[cfg(any(test, feature = "mocks"))]
pub use user_dao::MockUserDao;

pub use r#impl::{
    MemoryStore, PgCommentDaoImpl, PgInteractionDaoImpl, PgLikeDaoImpl, PgPostDaoImpl,
    PgUserDaoImpl,
};
