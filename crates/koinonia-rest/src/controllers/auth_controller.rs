//! Authentication controller.

use crate::{
    extractors::{AuthenticatedUser, JsonBody},
    responses::ApiReply,
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use koinonia_service::{
    AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest, UserProfile,
};
use tracing::debug;

/// Creates the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
}

async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiReply<AuthResponse> {
    state.auth_service.register(request).await.into()
}

async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiReply<AuthResponse> {
    state.auth_service.login(request).await.into()
}

async fn refresh_token(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RefreshTokenRequest>,
) -> ApiReply<AuthResponse> {
    debug!("Token refresh request");
    state.auth_service.refresh_token(request).await.into()
}

async fn logout(State(state): State<AppState>, user: AuthenticatedUser) -> ApiReply<MessageResponse> {
    state.auth_service.logout(user.user_id).await.into()
}

/// Profile of the signed-in member.
async fn get_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiReply<UserProfile> {
    debug!("Get current user: {}", user.claims.email);
    state.user_service.get_profile(user.user_id).await.into()
}
