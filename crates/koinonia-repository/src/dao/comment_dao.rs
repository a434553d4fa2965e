//! CommentDao trait.

use async_trait::async_trait;
use koinonia_core::{Comment, CommentId, CommentThread, DaoResult, NewComment, PageRequest, PostId};

/// Data access for comments.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CommentDao: Send + Sync {
    /// Inserts a comment. A missing post or parent is `NotFound`.
    async fn create(&self, comment: NewComment) -> DaoResult<Comment>;

    /// Finds a live comment by ID. Soft-deleted comments are `None`.
    async fn find_by_id(&self, id: CommentId) -> DaoResult<Option<Comment>>;

    /// Lists top-level comments on a post with their replies.
    async fn find_by_post(&self, post_id: PostId, page: PageRequest) -> DaoResult<Vec<CommentThread>>;

    /// Replaces the content of a live comment.
    async fn update(&self, id: CommentId, content: String) -> DaoResult<Comment>;

    /// Marks a live comment as deleted.
    async fn soft_delete(&self, id: CommentId) -> DaoResult<()>;
}
