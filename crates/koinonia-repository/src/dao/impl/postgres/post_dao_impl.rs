//! PostgreSQL implementation of [`PostDao`].

use super::contains_pattern;
use super::rows::{FeedRow, PostRow};
use crate::dao::error::{relabel, store_error};
use crate::{DatabasePool, PostDao};
use async_trait::async_trait;
use koinonia_core::{
    DaoError, DaoErrorKind, DaoResult, FeedPost, FeedQuery, NewPost, Post, PostChanges, PostId,
    UserId,
};
use std::sync::Arc;
use tracing::{debug, info};

/// PostgreSQL post DAO.
#[derive(Clone)]
pub struct PgPostDaoImpl {
    pool: Arc<DatabasePool>,
}

impl PgPostDaoImpl {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostDao for PgPostDaoImpl {
    async fn create(&self, post: NewPost) -> DaoResult<Post> {
        debug!("Creating post for author {}", post.author_id);

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, author_id, community_id, content, image_url, video_url,
                               verse_reference, verse_text, is_public)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, author_id, community_id, content, image_url, video_url,
                      verse_reference, verse_text, is_public, is_pinned, created_at, updated_at
            "#,
        )
        .bind(PostId::new().into_inner())
        .bind(post.author_id.into_inner())
        .bind(post.community_id.map(|id| id.into_inner()))
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.video_url)
        .bind(&post.verse_reference)
        .bind(&post.verse_text)
        .bind(post.is_public)
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| {
            relabel(
                store_error("create a post", e),
                DaoErrorKind::NotFound,
                "Author not found",
            )
        })?;

        let post = Post::from(row);
        info!("Post {} created", post.id);
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> DaoResult<Option<Post>> {
        debug!("Finding post by id: {}", id);

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_id, community_id, content, image_url, video_url,
                   verse_reference, verse_text, is_public, is_pinned, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await
        .map_err(|e| store_error("fetch the post", e))?;

        Ok(row.map(Post::from))
    }

    async fn find_feed(&self, query: FeedQuery) -> DaoResult<Vec<FeedPost>> {
        debug!(
            "Finding feed, limit: {}, offset: {}",
            query.page.limit, query.page.offset
        );

        let rows = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT p.id, p.author_id, p.community_id, p.content, p.image_url, p.video_url,
                   p.verse_reference, p.verse_text, p.is_public, p.is_pinned,
                   p.created_at, p.updated_at,
                   u.name AS author_name,
                   u.username AS author_username,
                   u.profile_image_url AS author_profile_image_url,
                   (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
                   (SELECT COUNT(*) FROM comments c
                     WHERE c.post_id = p.id AND c.deleted_at IS NULL) AS comment_count,
                   (SELECT COUNT(*) FROM interactions i
                     WHERE i.post_id = p.id AND i.interaction_type = 'share') AS share_count,
                   EXISTS(SELECT 1 FROM likes l
                           WHERE l.post_id = p.id AND l.user_id = $1) AS is_liked
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE (p.is_public OR p.author_id = $1)
              AND ($2::uuid IS NULL OR p.community_id = $2)
              AND ($3::uuid IS NULL OR p.author_id = $3)
              AND ($4::text IS NULL
                   OR p.content ILIKE $4
                   OR p.verse_reference ILIKE $4)
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(query.viewer.map(UserId::into_inner))
        .bind(query.community_id.map(|id| id.into_inner()))
        .bind(query.author_id.map(UserId::into_inner))
        .bind(query.search.as_deref().map(contains_pattern))
        .bind(query.page.sql_limit())
        .bind(query.page.sql_offset())
        .fetch_all(self.pool.inner())
        .await
        .map_err(|e| store_error("fetch posts", e))?;

        Ok(rows.into_iter().map(FeedPost::from).collect())
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> DaoResult<Post> {
        debug!("Updating post {}", id);

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET content = COALESCE($2, content),
                image_url = COALESCE($3, image_url),
                video_url = COALESCE($4, video_url),
                verse_reference = COALESCE($5, verse_reference),
                verse_text = COALESCE($6, verse_text),
                is_public = COALESCE($7, is_public),
                is_pinned = COALESCE($8, is_pinned),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, author_id, community_id, content, image_url, video_url,
                      verse_reference, verse_text, is_public, is_pinned, created_at, updated_at
            "#,
        )
        .bind(id.into_inner())
        .bind(&changes.content)
        .bind(&changes.image_url)
        .bind(&changes.video_url)
        .bind(&changes.verse_reference)
        .bind(&changes.verse_text)
        .bind(changes.is_public)
        .bind(changes.is_pinned)
        .fetch_optional(self.pool.inner())
        .await
        .map_err(|e| store_error("update the post", e))?;

        let post = row
            .map(Post::from)
            .ok_or_else(|| DaoError::not_found("Post not found"))?;
        info!("Post {} updated", id);
        Ok(post)
    }

    async fn delete_owned(&self, id: PostId, owner: UserId) -> DaoResult<()> {
        debug!("Deleting post {} owned by {}", id, owner);

        let (found, deleted) = sqlx::query_as::<_, (bool, bool)>(
            r#"
            WITH target AS (
                SELECT id, author_id FROM posts WHERE id = $1
            ),
            removed AS (
                DELETE FROM posts p
                USING target t
                WHERE p.id = t.id AND t.author_id = $2
                RETURNING p.id
            )
            SELECT EXISTS(SELECT 1 FROM target), EXISTS(SELECT 1 FROM removed)
            "#,
        )
        .bind(id.into_inner())
        .bind(owner.into_inner())
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| store_error("delete the post", e))?;

        match (found, deleted) {
            (_, true) => {
                info!("Post {} deleted", id);
                Ok(())
            }
            (true, false) => Err(DaoError::forbidden("You can only delete your own posts")),
            (false, false) => Err(DaoError::not_found("Post not found")),
        }
    }

    async fn count_by_author(&self, author: UserId) -> DaoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author.into_inner())
            .fetch_one(self.pool.inner())
            .await
            .map_err(|e| store_error("count posts", e))
    }
}
