//! PostgreSQL implementation of [`LikeDao`].

use super::rows::LikeRow;
use crate::dao::error::{relabel, store_error, violated_constraint};
use crate::{DatabasePool, LikeDao};
use async_trait::async_trait;
use koinonia_core::{
    DaoError, DaoErrorKind, DaoResult, Like, LikeId, PostId, UserId, ALREADY_LIKED,
};
use std::sync::Arc;
use tracing::{debug, info};

const POST_FOREIGN_KEY: &str = "fk_likes_post";

/// PostgreSQL like DAO.
///
/// Relies on `uq_likes_user_post` and the `fk_likes_post` foreign key
/// instead of checking first, so concurrent requests cannot double-like or
/// like a post that was just deleted.
#[derive(Clone)]
pub struct PgLikeDaoImpl {
    pool: Arc<DatabasePool>,
}

impl PgLikeDaoImpl {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeDao for PgLikeDaoImpl {
    async fn create(&self, user_id: UserId, post_id: PostId) -> DaoResult<Like> {
        debug!("User {} liking post {}", user_id, post_id);

        let row = sqlx::query_as::<_, LikeRow>(
            r#"
            INSERT INTO likes (id, user_id, post_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, post_id, created_at
            "#,
        )
        .bind(LikeId::new().into_inner())
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| {
            let constraint = violated_constraint(&e);
            let err = relabel(
                store_error("like the post", e),
                DaoErrorKind::AlreadyExists,
                ALREADY_LIKED,
            );
            match constraint.as_deref() {
                Some(POST_FOREIGN_KEY) => relabel(err, DaoErrorKind::NotFound, "Post not found"),
                // A missing liker is not a missing post.
                _ if err.is(DaoErrorKind::NotFound) => DaoError::store(err.message),
                _ => err,
            }
        })?;

        info!("User {} liked post {}", user_id, post_id);
        Ok(Like::from(row))
    }

    async fn delete(&self, user_id: UserId, post_id: PostId) -> DaoResult<()> {
        debug!("User {} unliking post {}", user_id, post_id);

        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id.into_inner())
            .bind(post_id.into_inner())
            .execute(self.pool.inner())
            .await
            .map_err(|e| store_error("unlike the post", e))?;

        if result.rows_affected() == 0 {
            return Err(DaoError::not_found("Like not found"));
        }
        info!("User {} unliked post {}", user_id, post_id);
        Ok(())
    }

    async fn exists(&self, user_id: UserId, post_id: PostId) -> DaoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| store_error("check the like", e))
    }
}
