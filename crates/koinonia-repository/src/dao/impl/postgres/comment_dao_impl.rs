//! PostgreSQL implementation of [`CommentDao`].

use super::rows::{CommentAuthorRow, CommentRow};
use crate::dao::error::{relabel, store_error, violated_constraint};
use crate::dao::r#impl::assemble_threads;
use crate::{CommentDao, DatabasePool};
use async_trait::async_trait;
use koinonia_core::{
    Comment, CommentId, CommentThread, CommentWithAuthor, DaoError, DaoErrorKind, DaoResult,
    NewComment, PageRequest, PostId,
};
use std::sync::Arc;
use tracing::{debug, info};

const POST_FOREIGN_KEY: &str = "fk_comments_post";

/// PostgreSQL comment DAO.
#[derive(Clone)]
pub struct PgCommentDaoImpl {
    pool: Arc<DatabasePool>,
}

impl PgCommentDaoImpl {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentDao for PgCommentDaoImpl {
    async fn create(&self, comment: NewComment) -> DaoResult<Comment> {
        debug!("Creating comment on post {}", comment.post_id);

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (id, post_id, author_id, parent_id, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, post_id, author_id, parent_id, content, deleted_at, created_at, updated_at
            "#,
        )
        .bind(CommentId::new().into_inner())
        .bind(comment.post_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(comment.parent_id.map(CommentId::into_inner))
        .bind(&comment.content)
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| {
            let constraint = violated_constraint(&e);
            let err = store_error("create a comment", e);
            match constraint.as_deref() {
                Some(POST_FOREIGN_KEY) => relabel(err, DaoErrorKind::NotFound, "Post not found"),
                _ if err.is(DaoErrorKind::NotFound) => DaoError::store(err.message),
                _ => err,
            }
        })?;

        let comment = Comment::from(row);
        info!("Comment {} created", comment.id);
        Ok(comment)
    }

    async fn find_by_id(&self, id: CommentId) -> DaoResult<Option<Comment>> {
        debug!("Finding comment by id: {}", id);

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, parent_id, content, deleted_at, created_at, updated_at
            FROM comments
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await
        .map_err(|e| store_error("fetch the comment", e))?;

        Ok(row.map(Comment::from))
    }

    async fn find_by_post(&self, post_id: PostId, page: PageRequest) -> DaoResult<Vec<CommentThread>> {
        debug!("Finding comments for post {}", post_id);

        let rows = sqlx::query_as::<_, CommentAuthorRow>(
            r#"
            WITH top AS (
                SELECT id FROM comments
                WHERE post_id = $1 AND parent_id IS NULL AND deleted_at IS NULL
                ORDER BY created_at ASC, id ASC
                LIMIT $2 OFFSET $3
            )
            SELECT c.id, c.post_id, c.author_id, c.parent_id, c.content, c.deleted_at,
                   c.created_at, c.updated_at,
                   u.name AS author_name,
                   u.username AS author_username,
                   u.profile_image_url AS author_profile_image_url
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.deleted_at IS NULL
              AND (c.id IN (SELECT id FROM top) OR c.parent_id IN (SELECT id FROM top))
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(post_id.into_inner())
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(self.pool.inner())
        .await
        .map_err(|e| store_error("fetch comments", e))?;

        Ok(assemble_threads(
            rows.into_iter().map(CommentWithAuthor::from),
        ))
    }

    async fn update(&self, id: CommentId, content: String) -> DaoResult<Comment> {
        debug!("Updating comment {}", id);

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET content = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, post_id, author_id, parent_id, content, deleted_at, created_at, updated_at
            "#,
        )
        .bind(id.into_inner())
        .bind(&content)
        .fetch_optional(self.pool.inner())
        .await
        .map_err(|e| store_error("update the comment", e))?;

        row.map(Comment::from)
            .ok_or_else(|| DaoError::not_found("Comment not found"))
    }

    async fn soft_delete(&self, id: CommentId) -> DaoResult<()> {
        debug!("Soft-deleting comment {}", id);

        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.into_inner())
        .execute(self.pool.inner())
        .await
        .map_err(|e| store_error("delete the comment", e))?;

        if result.rows_affected() == 0 {
            return Err(DaoError::not_found("Comment not found"));
        }
        info!("Comment {} deleted", id);
        Ok(())
    }
}
