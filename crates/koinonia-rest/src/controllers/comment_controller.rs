//! Comment controller.

use crate::{
    extractors::{AuthenticatedUser, JsonBody, OptionalUser, PathId},
    responses::ApiReply,
    state::AppState,
};
use axum::{extract::State, routing::get, Router};
use koinonia_core::{Comment, CommentId};
use koinonia_service::{MessageResponse, UpdateCommentRequest};

/// Creates the comment router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/:id",
        get(get_comment).put(update_comment).delete(delete_comment),
    )
}

async fn get_comment(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    PathId(comment_id): PathId<CommentId>,
) -> ApiReply<Comment> {
    state.comment_service.get_comment(comment_id, viewer).await.into()
}

async fn update_comment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathId(comment_id): PathId<CommentId>,
    JsonBody(request): JsonBody<UpdateCommentRequest>,
) -> ApiReply<Comment> {
    state
        .comment_service
        .update_comment(comment_id, user.user_id, request)
        .await
        .into()
}

async fn delete_comment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathId(comment_id): PathId<CommentId>,
) -> ApiReply<MessageResponse> {
    state
        .comment_service
        .delete_comment(comment_id, user.user_id)
        .await
        .into()
}
