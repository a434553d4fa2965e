//! InteractionDao trait.

use async_trait::async_trait;
use koinonia_core::{DaoResult, Interaction, NewInteraction};

/// Append-only log of engagement events.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait InteractionDao: Send + Sync {
    async fn create(&self, interaction: NewInteraction) -> DaoResult<Interaction>;
}
