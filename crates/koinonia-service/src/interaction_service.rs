//! Interaction service trait.

use crate::dto::RecordInteractionRequest;
use async_trait::async_trait;
use koinonia_core::{HttpMessage, Interaction};

/// Engagement analytics.
#[async_trait]
pub trait InteractionService: Send + Sync {
    /// Records a view, like, comment, share or bookmark. 201 on success.
    async fn record_interaction(&self, request: RecordInteractionRequest) -> HttpMessage<Interaction>;
}
