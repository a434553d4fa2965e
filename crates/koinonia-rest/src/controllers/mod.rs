//! REST API controllers.

pub mod auth_controller;
pub mod comment_controller;
pub mod health_controller;
pub mod interaction_controller;
pub mod post_controller;
pub mod user_controller;
