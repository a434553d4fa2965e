//! Comment DTOs.

use koinonia_core::{
    CommentId, CommentThread, PageRequest, Pagination, PostId, UserId, MAX_COMMENT_CONTENT,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to comment on a post. `post_id` comes from the path and
/// `author_id` from the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(length(max = MAX_COMMENT_CONTENT, message = "Comment is too long (max 1000 characters)"))]
    pub content: Option<String>,

    #[serde(default)]
    pub post_id: Option<PostId>,

    #[serde(default)]
    pub author_id: Option<UserId>,

    /// Set when replying to another comment.
    pub parent_id: Option<CommentId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    #[validate(length(max = MAX_COMMENT_CONTENT, message = "Comment is too long (max 1000 characters)"))]
    pub content: Option<String>,
}

/// One page of comment threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentPage {
    pub comments: Vec<CommentThread>,
    pub pagination: Pagination,
}

impl CommentPage {
    #[must_use]
    pub fn new(comments: Vec<CommentThread>, page: PageRequest) -> Self {
        let pagination = Pagination::for_page(page, comments.len());
        Self {
            comments,
            pagination,
        }
    }
}
