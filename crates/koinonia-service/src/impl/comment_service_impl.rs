//! Comment service implementation.

use super::{fallback, find_visible_post, record_side_interaction, POST_NOT_FOUND};
use crate::dto::{
    CommentPage, CreateCommentRequest, MessageResponse, PageQuery, UpdateCommentRequest,
};
use crate::CommentService;
use async_trait::async_trait;
use koinonia_core::{
    Comment, CommentId, DaoErrorKind, ErrorTag, HttpMessage, InteractionType, NewComment,
    PostId, UserId, ValidateExt,
};
use koinonia_repository::{CommentDao, InteractionDao, PostDao};
use std::sync::Arc;
use tracing::{debug, info};

const COMMENT_NOT_FOUND: &str = "Comment not found";

/// Comment service backed by the comment, post and interaction DAOs.
pub struct CommentServiceImpl {
    comment_dao: Arc<dyn CommentDao>,
    post_dao: Arc<dyn PostDao>,
    interaction_dao: Arc<dyn InteractionDao>,
}

impl CommentServiceImpl {
    pub fn new(
        comment_dao: Arc<dyn CommentDao>,
        post_dao: Arc<dyn PostDao>,
        interaction_dao: Arc<dyn InteractionDao>,
    ) -> Self {
        Self {
            comment_dao,
            post_dao,
            interaction_dao,
        }
    }

    async fn find_comment<T>(
        &self,
        comment_id: CommentId,
        tag: ErrorTag,
    ) -> Result<Comment, HttpMessage<T>> {
        match self.comment_dao.find_by_id(comment_id).await {
            Ok(Some(comment)) => Ok(comment),
            Ok(None) => Err(HttpMessage::not_found(COMMENT_NOT_FOUND, ErrorTag::CommentNotFound)),
            Err(e) if e.is(DaoErrorKind::NotFound) => {
                Err(HttpMessage::not_found(COMMENT_NOT_FOUND, ErrorTag::CommentNotFound))
            }
            Err(e) => Err(fallback(&e, tag)),
        }
    }

    /// Resolves the parent a new reply hangs under.
    ///
    /// Threads are one level deep, so a reply to a reply attaches to the
    /// reply's own parent.
    async fn resolve_parent(
        &self,
        post_id: PostId,
        parent_id: CommentId,
    ) -> Result<CommentId, HttpMessage<Comment>> {
        let parent = match self.comment_dao.find_by_id(parent_id).await {
            Ok(Some(parent)) => parent,
            Ok(None) => return Err(HttpMessage::validation("Parent comment not found")),
            Err(e) => return Err(fallback(&e, ErrorTag::CreateCommentError)),
        };
        if parent.post_id != post_id {
            return Err(HttpMessage::validation(
                "Parent comment belongs to a different post",
            ));
        }
        Ok(parent.parent_id.unwrap_or(parent.id))
    }
}

#[async_trait]
impl CommentService for CommentServiceImpl {
    async fn get_comments(
        &self,
        post_id: PostId,
        page: PageQuery,
        viewer: Option<UserId>,
    ) -> HttpMessage<CommentPage> {
        let page = match page.to_page_request() {
            Ok(page) => page,
            Err(message) => return HttpMessage::validation(message),
        };

        debug!("Getting comments for post {}", post_id);

        if let Err(failure) = find_visible_post::<CommentPage>(
            self.post_dao.as_ref(),
            post_id,
            viewer,
            ErrorTag::GetCommentsError,
        )
        .await
        {
            return failure;
        }

        match self.comment_dao.find_by_post(post_id, page).await {
            Ok(threads) => HttpMessage::ok(CommentPage::new(threads, page)),
            Err(e) => fallback(&e, ErrorTag::GetCommentsError),
        }
    }

    async fn create_comment(&self, request: CreateCommentRequest) -> HttpMessage<Comment> {
        let content = request
            .content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
        let (Some(content), Some(post_id), Some(author_id)) =
            (content, request.post_id, request.author_id)
        else {
            return HttpMessage::validation("Content, postId and authorId are required");
        };
        if let Some(message) = request.validation_failure() {
            return HttpMessage::validation(message);
        }

        debug!("User {} commenting on post {}", author_id, post_id);

        if let Err(failure) = find_visible_post::<Comment>(
            self.post_dao.as_ref(),
            post_id,
            Some(author_id),
            ErrorTag::CreateCommentError,
        )
        .await
        {
            return failure;
        }

        let parent_id = match request.parent_id {
            Some(parent_id) => match self.resolve_parent(post_id, parent_id).await {
                Ok(resolved) => Some(resolved),
                Err(failure) => return failure,
            },
            None => None,
        };

        let new_comment = NewComment {
            post_id,
            author_id,
            parent_id,
            content,
        };
        match self.comment_dao.create(new_comment).await {
            Ok(comment) => {
                info!("Comment {} added to post {}", comment.id, post_id);
                record_side_interaction(
                    self.interaction_dao.as_ref(),
                    author_id,
                    Some(post_id),
                    Some(comment.id),
                    InteractionType::Comment,
                )
                .await;
                HttpMessage::created(comment)
            }
            Err(e) if e.is(DaoErrorKind::NotFound) => {
                HttpMessage::not_found(POST_NOT_FOUND, ErrorTag::PostNotFound)
            }
            Err(e) => fallback(&e, ErrorTag::CreateCommentError),
        }
    }

    async fn get_comment(
        &self,
        comment_id: CommentId,
        viewer: Option<UserId>,
    ) -> HttpMessage<Comment> {
        debug!("Getting comment {}", comment_id);

        let comment = match self.find_comment(comment_id, ErrorTag::GetCommentError).await {
            Ok(comment) => comment,
            Err(failure) => return failure,
        };
        match find_visible_post::<Comment>(
            self.post_dao.as_ref(),
            comment.post_id,
            viewer,
            ErrorTag::GetCommentError,
        )
        .await
        {
            Ok(_) => HttpMessage::ok(comment),
            Err(failure) => failure,
        }
    }

    async fn update_comment(
        &self,
        comment_id: CommentId,
        user_id: UserId,
        request: UpdateCommentRequest,
    ) -> HttpMessage<Comment> {
        let content = request
            .content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
        let Some(content) = content else {
            return HttpMessage::validation("Content is required");
        };
        if let Some(message) = request.validation_failure() {
            return HttpMessage::validation(message);
        }

        debug!("Updating comment {} for user {}", comment_id, user_id);

        let comment = match self.find_comment(comment_id, ErrorTag::UpdateCommentError).await {
            Ok(comment) => comment,
            Err(failure) => return failure,
        };
        if !comment.is_authored_by(user_id) {
            return HttpMessage::forbidden(
                "You can only edit your own comments",
                ErrorTag::Unauthorized,
            );
        }

        match self.comment_dao.update(comment_id, content).await {
            Ok(comment) => {
                info!("Comment {} updated", comment_id);
                HttpMessage::ok(comment)
            }
            Err(e) if e.is(DaoErrorKind::NotFound) => {
                HttpMessage::not_found(COMMENT_NOT_FOUND, ErrorTag::CommentNotFound)
            }
            Err(e) => fallback(&e, ErrorTag::UpdateCommentError),
        }
    }

    async fn delete_comment(
        &self,
        comment_id: CommentId,
        user_id: UserId,
    ) -> HttpMessage<MessageResponse> {
        debug!("Deleting comment {} for user {}", comment_id, user_id);

        let comment = match self.find_comment(comment_id, ErrorTag::DeleteCommentError).await {
            Ok(comment) => comment,
            Err(failure) => return failure,
        };

        if !comment.is_authored_by(user_id) {
            let owns_post = match self.post_dao.find_by_id(comment.post_id).await {
                Ok(post) => post.is_some_and(|p| p.is_owned_by(user_id)),
                Err(e) => return fallback(&e, ErrorTag::DeleteCommentError),
            };
            if !owns_post {
                return HttpMessage::forbidden(
                    "You can only delete your own comments",
                    ErrorTag::Unauthorized,
                );
            }
        }

        match self.comment_dao.soft_delete(comment_id).await {
            Ok(()) => {
                info!("Comment {} deleted by user {}", comment_id, user_id);
                HttpMessage::ok(MessageResponse::new("Comment deleted successfully"))
            }
            Err(e) if e.is(DaoErrorKind::NotFound) => {
                HttpMessage::not_found(COMMENT_NOT_FOUND, ErrorTag::CommentNotFound)
            }
            Err(e) => fallback(&e, ErrorTag::DeleteCommentError),
        }
    }
}
