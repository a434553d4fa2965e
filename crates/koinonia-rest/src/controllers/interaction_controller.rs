//! Interaction controller.

use crate::{
    extractors::{AuthenticatedUser, JsonBody},
    responses::ApiReply,
    state::AppState,
};
use axum::{extract::State, routing::post, Router};
use koinonia_core::Interaction;
use koinonia_service::RecordInteractionRequest;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(record_interaction))
}

async fn record_interaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(mut request): JsonBody<RecordInteractionRequest>,
) -> ApiReply<Interaction> {
    request.user_id = Some(user.user_id);
    state
        .interaction_service
        .record_interaction(request)
        .await
        .into()
}
