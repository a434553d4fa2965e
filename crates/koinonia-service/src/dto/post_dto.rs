//! Post DTOs.

use super::PageQuery;
use koinonia_core::{
    CommunityId, FeedPost, PageRequest, Pagination, PostChanges, PostId, UserId, MAX_POST_CONTENT,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to publish a post. `author_id` is filled from the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(max = MAX_POST_CONTENT, message = "Content is too long (max 5000 characters)"))]
    pub content: Option<String>,

    #[serde(default)]
    pub author_id: Option<UserId>,

    pub community_id: Option<CommunityId>,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,

    #[validate(url(message = "Invalid video URL"))]
    pub video_url: Option<String>,

    #[validate(length(max = 100, message = "Verse reference is too long (max 100 characters)"))]
    pub verse_reference: Option<String>,

    pub verse_text: Option<String>,

    /// Defaults to public.
    pub is_public: Option<bool>,
}

/// Partial post update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[validate(length(max = MAX_POST_CONTENT, message = "Content is too long (max 5000 characters)"))]
    pub content: Option<String>,

    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,

    #[validate(url(message = "Invalid video URL"))]
    pub video_url: Option<String>,

    #[validate(length(max = 100, message = "Verse reference is too long (max 100 characters)"))]
    pub verse_reference: Option<String>,

    pub verse_text: Option<String>,
    pub is_public: Option<bool>,
    pub is_pinned: Option<bool>,
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(request: UpdatePostRequest) -> Self {
        Self {
            content: request.content.map(|c| c.trim().to_string()),
            image_url: request.image_url,
            video_url: request.video_url,
            verse_reference: request.verse_reference,
            verse_text: request.verse_text,
            is_public: request.is_public,
            is_pinned: request.is_pinned,
        }
    }
}

/// Feed query parameters.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub community_id: Option<CommunityId>,
    pub author_id: Option<UserId>,
    #[validate(length(max = 100, message = "Search term is too long (max 100 characters)"))]
    pub search: Option<String>,
}

impl FeedRequest {
    #[must_use]
    pub const fn page(&self) -> PageQuery {
        PageQuery {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// One page of the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<FeedPost>,
    pub pagination: Pagination,
}

impl FeedPage {
    #[must_use]
    pub fn new(posts: Vec<FeedPost>, page: PageRequest) -> Self {
        let pagination = Pagination::for_page(page, posts.len());
        Self { posts, pagination }
    }
}

/// Like toggle request. `user_id` is filled from the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikePostRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub post_id: Option<PostId>,
    pub action: Option<String>,
}

/// The two states a like can be moved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Like,
    Unlike,
}

impl LikeAction {
    /// Parses `like` or `unlike`, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "like" => Some(Self::Like),
            "unlike" => Some(Self::Unlike),
            _ => None,
        }
    }
}

/// Result of a like toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub action: LikeAction,
    pub post_id: PostId,
    pub user_id: UserId,
}
