//! Post controller, including the comment listing under a post.

use crate::{
    extractors::{AuthenticatedUser, JsonBody, OptionalUser, PathId, QueryParams},
    responses::ApiReply,
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use koinonia_core::{Comment, Post, PostId};
use koinonia_service::{
    CommentPage, CreateCommentRequest, CreatePostRequest, FeedPage, FeedRequest, LikePostRequest,
    LikeResponse, MessageResponse, PageQuery, UpdatePostRequest,
};

/// Creates the post router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_feed).post(create_post))
        .route("/like", post(like_post))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
        .route("/:id/comments", get(get_comments).post(create_comment))
}

async fn get_feed(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    QueryParams(request): QueryParams<FeedRequest>,
) -> ApiReply<FeedPage> {
    state.post_service.get_feed(request, viewer).await.into()
}

async fn create_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(mut request): JsonBody<CreatePostRequest>,
) -> ApiReply<Post> {
    request.author_id = Some(user.user_id);
    state.post_service.create_post(request).await.into()
}

async fn like_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(mut request): JsonBody<LikePostRequest>,
) -> ApiReply<LikeResponse> {
    request.user_id = Some(user.user_id);
    state.post_service.like_post(request).await.into()
}

async fn get_post(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    PathId(post_id): PathId<PostId>,
) -> ApiReply<Post> {
    state.post_service.get_post(post_id, viewer).await.into()
}

async fn update_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathId(post_id): PathId<PostId>,
    JsonBody(request): JsonBody<UpdatePostRequest>,
) -> ApiReply<Post> {
    state
        .post_service
        .update_post(post_id, user.user_id, request)
        .await
        .into()
}

async fn delete_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathId(post_id): PathId<PostId>,
) -> ApiReply<MessageResponse> {
    state.post_service.delete_post(post_id, user.user_id).await.into()
}

async fn get_comments(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    PathId(post_id): PathId<PostId>,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiReply<CommentPage> {
    state
        .comment_service
        .get_comments(post_id, page, viewer)
        .await
        .into()
}

async fn create_comment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathId(post_id): PathId<PostId>,
    JsonBody(mut request): JsonBody<CreateCommentRequest>,
) -> ApiReply<Comment> {
    request.post_id = Some(post_id);
    request.author_id = Some(user.user_id);
    state.comment_service.create_comment(request).await.into()
}
