//! Comment service trait.

use crate::dto::{CommentPage, CreateCommentRequest, MessageResponse, PageQuery, UpdateCommentRequest};
use async_trait::async_trait;
use koinonia_core::{Comment, CommentId, HttpMessage, PostId, UserId};

/// Comment threads on posts.
#[async_trait]
pub trait CommentService: Send + Sync {
    /// Lists top-level comments with their replies, oldest first.
    ///
    /// Comments on a private post are only listed for its author.
    async fn get_comments(
        &self,
        post_id: PostId,
        page: PageQuery,
        viewer: Option<UserId>,
    ) -> HttpMessage<CommentPage>;

    /// Comments on a post, or replies to a comment on the same post.
    async fn create_comment(&self, request: CreateCommentRequest) -> HttpMessage<Comment>;

    async fn get_comment(
        &self,
        comment_id: CommentId,
        viewer: Option<UserId>,
    ) -> HttpMessage<Comment>;

    /// Edits a comment. Only its author may edit.
    async fn update_comment(
        &self,
        comment_id: CommentId,
        user_id: UserId,
        request: UpdateCommentRequest,
    ) -> HttpMessage<Comment>;

    /// Removes a comment. Allowed for its author and the post's author.
    async fn delete_comment(
        &self,
        comment_id: CommentId,
        user_id: UserId,
    ) -> HttpMessage<MessageResponse>;
}
