//! LikeDao trait.

use async_trait::async_trait;
use koinonia_core::{DaoResult, Like, PostId, UserId};

/// Data access for likes.
///
/// Uniqueness of `(user, post)` and existence of the post are enforced by
/// the store itself, so `create` never needs a prior existence check.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait LikeDao: Send + Sync {
    /// Records a like.
    ///
    /// A duplicate is `AlreadyExists` with message "Already liked"; a post
    /// that no longer exists is `NotFound`. A liker that no longer exists
    /// is a plain `Store` failure.
    async fn create(&self, user_id: UserId, post_id: PostId) -> DaoResult<Like>;

    /// Removes a like. A like that does not exist is `NotFound`.
    async fn delete(&self, user_id: UserId, post_id: PostId) -> DaoResult<()>;

    /// Whether the user currently likes the post.
    async fn exists(&self, user_id: UserId, post_id: PostId) -> DaoResult<bool>;
}
