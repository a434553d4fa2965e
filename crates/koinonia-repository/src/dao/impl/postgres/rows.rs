//! Database row representations and their conversion to entities.

use chrono::{DateTime, Utc};
use koinonia_core::{
    AuthorSummary, Comment, CommentId, CommentWithAuthor, CommunityId, DaoError, Email, FeedPost,
    Interaction, InteractionId, InteractionType, Like, LikeId, Post, PostId, PostStats, User,
    UserId,
};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub(super) struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    name: String,
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
    profile_image_url: Option<String>,
    denomination: Option<String>,
    bio: Option<String>,
    favorite_verse: Option<String>,
    is_verified: bool,
    failed_login_attempts: i32,
    locked_until: Option<DateTime<Utc>>,
    refresh_token_hash: Option<String>,
    refresh_token_expires_at: Option<DateTime<Utc>>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: Email::new_unchecked(row.email),
            password_hash: row.password_hash,
            name: row.name,
            first_name: row.first_name,
            last_name: row.last_name,
            username: row.username,
            profile_image_url: row.profile_image_url,
            denomination: row.denomination,
            bio: row.bio,
            favorite_verse: row.favorite_verse,
            is_verified: row.is_verified,
            failed_login_attempts: row.failed_login_attempts,
            locked_until: row.locked_until,
            refresh_token_hash: row.refresh_token_hash,
            refresh_token_expires_at: row.refresh_token_expires_at,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct PostRow {
    id: Uuid,
    author_id: Uuid,
    community_id: Option<Uuid>,
    content: String,
    image_url: Option<String>,
    video_url: Option<String>,
    verse_reference: Option<String>,
    verse_text: Option<String>,
    is_public: bool,
    is_pinned: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::from_uuid(row.id),
            author_id: UserId::from_uuid(row.author_id),
            community_id: row.community_id.map(CommunityId::from_uuid),
            content: row.content,
            image_url: row.image_url,
            video_url: row.video_url,
            verse_reference: row.verse_reference,
            verse_text: row.verse_text,
            is_public: row.is_public,
            is_pinned: row.is_pinned,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Author columns joined onto posts and comments.
#[derive(Debug, FromRow)]
pub(super) struct AuthorColumns {
    author_name: String,
    author_username: Option<String>,
    author_profile_image_url: Option<String>,
}

impl AuthorColumns {
    fn into_summary(self, id: UserId) -> AuthorSummary {
        AuthorSummary {
            id,
            name: self.author_name,
            username: self.author_username,
            profile_image_url: self.author_profile_image_url,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct FeedRow {
    #[sqlx(flatten)]
    post: PostRow,
    #[sqlx(flatten)]
    author: AuthorColumns,
    like_count: i64,
    comment_count: i64,
    share_count: i64,
    is_liked: bool,
}

impl From<FeedRow> for FeedPost {
    fn from(row: FeedRow) -> Self {
        let post = Post::from(row.post);
        let author = row.author.into_summary(post.author_id);
        Self {
            post,
            author,
            stats: PostStats {
                likes: row.like_count,
                comments: row.comment_count,
                shares: row.share_count,
            },
            is_liked: row.is_liked,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    parent_id: Option<Uuid>,
    content: String,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: CommentId::from_uuid(row.id),
            post_id: PostId::from_uuid(row.post_id),
            author_id: UserId::from_uuid(row.author_id),
            parent_id: row.parent_id.map(CommentId::from_uuid),
            content: row.content,
            deleted_at: row.deleted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct CommentAuthorRow {
    #[sqlx(flatten)]
    comment: CommentRow,
    #[sqlx(flatten)]
    author: AuthorColumns,
}

impl From<CommentAuthorRow> for CommentWithAuthor {
    fn from(row: CommentAuthorRow) -> Self {
        let comment = Comment::from(row.comment);
        let author = row.author.into_summary(comment.author_id);
        Self { comment, author }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct LikeRow {
    id: Uuid,
    user_id: Uuid,
    post_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<LikeRow> for Like {
    fn from(row: LikeRow) -> Self {
        Self {
            id: LikeId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            post_id: PostId::from_uuid(row.post_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct InteractionRow {
    id: Uuid,
    user_id: Uuid,
    post_id: Option<Uuid>,
    comment_id: Option<Uuid>,
    interaction_type: String,
    duration: Option<i32>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = DaoError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        let interaction_type = row
            .interaction_type
            .parse::<InteractionType>()
            .map_err(|e| DaoError::store(e.to_string()))?;

        Ok(Self {
            id: InteractionId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            post_id: row.post_id.map(PostId::from_uuid),
            comment_id: row.comment_id.map(CommentId::from_uuid),
            interaction_type,
            duration: row.duration,
            created_at: row.created_at,
        })
    }
}
