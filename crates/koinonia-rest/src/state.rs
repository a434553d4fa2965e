//! Application state for Axum handlers.

use koinonia_repository::StoreHealth;
use koinonia_service::{AuthService, CommentService, InteractionService, PostService, UserService};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub post_service: Arc<dyn PostService>,
    pub comment_service: Arc<dyn CommentService>,
    pub interaction_service: Arc<dyn InteractionService>,
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    /// Pinged by the readiness check.
    pub store: Arc<dyn StoreHealth>,
}
