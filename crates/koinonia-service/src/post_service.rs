//! Post service trait.

use crate::dto::{
    CreatePostRequest, FeedPage, FeedRequest, LikePostRequest, LikeResponse, MessageResponse,
    UpdatePostRequest,
};
use async_trait::async_trait;
use koinonia_core::{HttpMessage, Post, PostId, UserId};

/// Publishing, reading and liking posts.
#[async_trait]
pub trait PostService: Send + Sync {
    /// Publishes a post. 201 on success.
    async fn create_post(&self, request: CreatePostRequest) -> HttpMessage<Post>;

    /// Fetches one post. Private posts are visible to their author only.
    async fn get_post(&self, post_id: PostId, viewer: Option<UserId>) -> HttpMessage<Post>;

    /// Returns a page of the feed, newest first.
    async fn get_feed(&self, request: FeedRequest, viewer: Option<UserId>) -> HttpMessage<FeedPage>;

    /// Edits a post. Only the author may edit.
    async fn update_post(
        &self,
        post_id: PostId,
        user_id: UserId,
        request: UpdatePostRequest,
    ) -> HttpMessage<Post>;

    /// Deletes a post with its comments and likes. Only the author may delete.
    async fn delete_post(&self, post_id: PostId, user_id: UserId) -> HttpMessage<MessageResponse>;

    /// Likes or unlikes a post.
    async fn like_post(&self, request: LikePostRequest) -> HttpMessage<LikeResponse>;
}
