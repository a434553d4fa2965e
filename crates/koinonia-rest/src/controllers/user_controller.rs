//! User profile controller.

use crate::{
    extractors::{AuthenticatedUser, JsonBody, PathId, QueryParams},
    responses::ApiReply,
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use koinonia_core::UserId;
use koinonia_service::{UpdateProfileRequest, UserPage, UserProfile, UserSearchRequest};

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", put(update_profile))
        .route("/:id", get(get_profile))
}

async fn list_users(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    QueryParams(request): QueryParams<UserSearchRequest>,
) -> ApiReply<UserPage> {
    state.user_service.list_users(request).await.into()
}

async fn get_profile(
    State(state): State<AppState>,
    PathId(user_id): PathId<UserId>,
) -> ApiReply<UserProfile> {
    state.user_service.get_profile(user_id).await.into()
}

async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(request): JsonBody<UpdateProfileRequest>,
) -> ApiReply<UserProfile> {
    state
        .user_service
        .update_profile(user.user_id, request)
        .await
        .into()
}
