//! PostgreSQL implementation of [`InteractionDao`].

use super::rows::InteractionRow;
use crate::dao::error::{relabel, store_error};
use crate::{DatabasePool, InteractionDao};
use async_trait::async_trait;
use koinonia_core::{DaoErrorKind, DaoResult, Interaction, InteractionId, NewInteraction};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct PgInteractionDaoImpl {
    pool: Arc<DatabasePool>,
}

impl PgInteractionDaoImpl {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionDao for PgInteractionDaoImpl {
    async fn create(&self, interaction: NewInteraction) -> DaoResult<Interaction> {
        debug!(
            "Recording {} interaction for user {}",
            interaction.interaction_type, interaction.user_id
        );

        let row = sqlx::query_as::<_, InteractionRow>(
            r#"
            INSERT INTO interactions (id, user_id, post_id, comment_id, interaction_type, duration)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, post_id, comment_id, interaction_type, duration, created_at
            "#,
        )
        .bind(InteractionId::new().into_inner())
        .bind(interaction.user_id.into_inner())
        .bind(interaction.post_id.map(|id| id.into_inner()))
        .bind(interaction.comment_id.map(|id| id.into_inner()))
        .bind(interaction.interaction_type.as_str())
        .bind(interaction.duration)
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| {
            relabel(
                store_error("record the interaction", e),
                DaoErrorKind::NotFound,
                "Interaction target not found",
            )
        })?;

        Interaction::try_from(row)
    }
}
