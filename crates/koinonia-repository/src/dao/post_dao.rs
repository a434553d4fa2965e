//! PostDao trait.

use async_trait::async_trait;
use koinonia_core::{DaoResult, FeedPost, FeedQuery, NewPost, Post, PostChanges, PostId, UserId};

/// Data access for posts.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PostDao: Send + Sync {
    /// Inserts a post and returns the stored row.
    async fn create(&self, post: NewPost) -> DaoResult<Post>;

    /// Finds a post by ID.
    async fn find_by_id(&self, id: PostId) -> DaoResult<Option<Post>>;

    /// Lists feed posts, newest first.
    async fn find_feed(&self, query: FeedQuery) -> DaoResult<Vec<FeedPost>>;

    /// Applies a partial update. A missing post is `NotFound`.
    async fn update(&self, id: PostId, changes: PostChanges) -> DaoResult<Post>;

    /// Deletes a post if `owner` wrote it.
    ///
    /// A missing post is `NotFound`; someone else's post is `Forbidden`.
    async fn delete_owned(&self, id: PostId, owner: UserId) -> DaoResult<()>;

    /// Counts posts written by a member.
    async fn count_by_author(&self, author: UserId) -> DaoResult<i64>;
}
