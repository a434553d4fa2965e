//! Interaction DTOs.

use koinonia_core::{CommentId, PostId, UserId};
use serde::{Deserialize, Serialize};

/// Engagement event reported by a client. `user_id` comes from the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInteractionRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub post_id: Option<PostId>,
    pub comment_id: Option<CommentId>,
    /// One of `view`, `like`, `comment`, `share`, `bookmark`.
    #[serde(rename = "type", alias = "interactionType")]
    pub interaction_type: Option<String>,
    /// Dwell time in seconds.
    pub duration: Option<i32>,
}
