//! Post entity and feed read model.

use crate::{AuthorSummary, CommunityId, PageRequest, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post published by a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub community_id: Option<CommunityId>,
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub verse_reference: Option<String>,
    pub verse_text: Option<String>,
    pub is_public: bool,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    /// Public posts are visible to everyone, private ones only to their author.
    #[must_use]
    pub fn is_visible_to(&self, viewer: Option<UserId>) -> bool {
        self.is_public || viewer.is_some_and(|id| self.is_owned_by(id))
    }
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: UserId,
    pub community_id: Option<CommunityId>,
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub verse_reference: Option<String>,
    pub verse_text: Option<String>,
    pub is_public: bool,
}

impl NewPost {
    /// Materializes the row the store will hold.
    #[must_use]
    pub fn into_post(self, id: PostId, now: DateTime<Utc>) -> Post {
        Post {
            id,
            author_id: self.author_id,
            community_id: self.community_id,
            content: self.content,
            image_url: self.image_url,
            video_url: self.video_url,
            verse_reference: self.verse_reference,
            verse_text: self.verse_text,
            is_public: self.is_public,
            is_pinned: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial post update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub verse_reference: Option<String>,
    pub verse_text: Option<String>,
    pub is_public: Option<bool>,
    pub is_pinned: Option<bool>,
}

impl PostChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.image_url.is_none()
            && self.video_url.is_none()
            && self.verse_reference.is_none()
            && self.verse_text.is_none()
            && self.is_public.is_none()
            && self.is_pinned.is_none()
    }

    pub fn apply(&self, post: &mut Post) {
        if let Some(content) = &self.content {
            post.content.clone_from(content);
        }
        if let Some(v) = &self.image_url {
            post.image_url = Some(v.clone());
        }
        if let Some(v) = &self.video_url {
            post.video_url = Some(v.clone());
        }
        if let Some(v) = &self.verse_reference {
            post.verse_reference = Some(v.clone());
        }
        if let Some(v) = &self.verse_text {
            post.verse_text = Some(v.clone());
        }
        if let Some(v) = self.is_public {
            post.is_public = v;
        }
        if let Some(v) = self.is_pinned {
            post.is_pinned = v;
        }
        post.updated_at = Utc::now();
    }
}

/// Engagement counters for a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStats {
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
}

/// A post as it appears in a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorSummary,
    pub stats: PostStats,
    /// Whether the requesting member has liked the post.
    pub is_liked: bool,
}

/// Feed selection.
///
/// Returns public posts plus the viewer's own private ones, newest first.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub viewer: Option<UserId>,
    pub community_id: Option<CommunityId>,
    /// Only posts written by this member.
    pub author_id: Option<UserId>,
    /// Case-insensitive substring of the content or verse reference.
    pub search: Option<String>,
    pub page: PageRequest,
}

impl FeedQuery {
    /// Whether `post` passes the author and search filters.
    ///
    /// Visibility is checked separately.
    #[must_use]
    pub fn matches(&self, post: &Post) -> bool {
        if self.community_id.is_some() && post.community_id != self.community_id {
            return false;
        }
        if self.author_id.is_some_and(|author| post.author_id != author) {
            return false;
        }
        self.search.as_deref().map_or(true, |term| {
            let term = term.to_lowercase();
            post.content.to_lowercase().contains(&term)
                || post
                    .verse_reference
                    .as_deref()
                    .is_some_and(|r| r.to_lowercase().contains(&term))
        })
    }
}
