//! Interaction service implementation.

use super::fallback;
use crate::dto::RecordInteractionRequest;
use crate::InteractionService;
use async_trait::async_trait;
use koinonia_core::{ErrorTag, HttpMessage, Interaction, InteractionType, NewInteraction};
use koinonia_repository::InteractionDao;
use std::sync::Arc;
use tracing::debug;

pub struct InteractionServiceImpl {
    interaction_dao: Arc<dyn InteractionDao>,
}

impl InteractionServiceImpl {
    pub fn new(interaction_dao: Arc<dyn InteractionDao>) -> Self {
        Self { interaction_dao }
    }
}

#[async_trait]
impl InteractionService for InteractionServiceImpl {
    async fn record_interaction(
        &self,
        request: RecordInteractionRequest,
    ) -> HttpMessage<Interaction> {
        let kind = request
            .interaction_type
            .as_deref()
            .filter(|t| !t.trim().is_empty());
        let (Some(user_id), Some(kind)) = (request.user_id, kind) else {
            return HttpMessage::validation("userId and type are required");
        };
        let interaction_type = match kind.parse::<InteractionType>() {
            Ok(interaction_type) => interaction_type,
            Err(e) => return HttpMessage::validation(e.to_string()),
        };
        if request.post_id.is_none() && request.comment_id.is_none() {
            return HttpMessage::validation("postId or commentId is required");
        }
        if request.duration.is_some_and(|d| d < 0) {
            return HttpMessage::validation("Duration cannot be negative");
        }

        debug!("Recording {} interaction for user {}", interaction_type, user_id);

        let interaction = NewInteraction {
            user_id,
            post_id: request.post_id,
            comment_id: request.comment_id,
            interaction_type,
            duration: request.duration,
        };
        match self.interaction_dao.create(interaction).await {
            Ok(interaction) => HttpMessage::created(interaction),
            Err(e) => fallback(&e, ErrorTag::InteractionError),
        }
    }
}
