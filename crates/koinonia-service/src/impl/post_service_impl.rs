//! Post service implementation.

use super::{fallback, find_visible_post, record_side_interaction, POST_NOT_FOUND};
use crate::dto::{
    CreatePostRequest, FeedPage, FeedRequest, LikeAction, LikePostRequest, LikeResponse,
    MessageResponse, UpdatePostRequest,
};
use crate::PostService;
use async_trait::async_trait;
use koinonia_core::{
    non_blank, DaoErrorKind, ErrorTag, FeedQuery, HttpMessage, InteractionType, NewPost, Post,
    PostChanges, PostId, UserId, ValidateExt,
};
use koinonia_repository::{InteractionDao, LikeDao, PostDao};
use std::sync::Arc;
use tracing::{debug, info};

/// Post service backed by the post, like and interaction DAOs.
pub struct PostServiceImpl {
    post_dao: Arc<dyn PostDao>,
    like_dao: Arc<dyn LikeDao>,
    interaction_dao: Arc<dyn InteractionDao>,
}

impl PostServiceImpl {
    /// Creates a new post service.
    pub fn new(
        post_dao: Arc<dyn PostDao>,
        like_dao: Arc<dyn LikeDao>,
        interaction_dao: Arc<dyn InteractionDao>,
    ) -> Self {
        Self {
            post_dao,
            like_dao,
            interaction_dao,
        }
    }

    async fn find_owned(
        &self,
        post_id: PostId,
        user_id: UserId,
        tag: ErrorTag,
    ) -> Result<Post, HttpMessage<Post>> {
        let post = match self.post_dao.find_by_id(post_id).await {
            Ok(Some(post)) => post,
            Ok(None) => return Err(HttpMessage::not_found(POST_NOT_FOUND, ErrorTag::PostNotFound)),
            Err(e) if e.is(DaoErrorKind::NotFound) => {
                return Err(HttpMessage::not_found(POST_NOT_FOUND, ErrorTag::PostNotFound))
            }
            Err(e) => return Err(fallback(&e, tag)),
        };

        if !post.is_owned_by(user_id) {
            return Err(HttpMessage::forbidden(
                "You can only edit your own posts",
                ErrorTag::Unauthorized,
            ));
        }
        Ok(post)
    }
}

#[async_trait]
impl PostService for PostServiceImpl {
    async fn create_post(&self, request: CreatePostRequest) -> HttpMessage<Post> {
        let content = request
            .content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
        let (Some(author_id), Some(content)) = (request.author_id, content) else {
            return HttpMessage::validation("Content and authorId are required");
        };
        if let Some(message) = request.validation_failure() {
            return HttpMessage::validation(message);
        }

        debug!("Creating post for user {}", author_id);

        let new_post = NewPost {
            author_id,
            community_id: request.community_id,
            content,
            image_url: request.image_url,
            video_url: request.video_url,
            verse_reference: request.verse_reference,
            verse_text: request.verse_text,
            is_public: request.is_public.unwrap_or(true),
        };

        match self.post_dao.create(new_post).await {
            Ok(post) => {
                info!("Post {} created by user {}", post.id, author_id);
                HttpMessage::created(post)
            }
            Err(e) => fallback(&e, ErrorTag::CreatePostError),
        }
    }

    async fn get_post(&self, post_id: PostId, viewer: Option<UserId>) -> HttpMessage<Post> {
        debug!("Getting post {}", post_id);

        match find_visible_post(self.post_dao.as_ref(), post_id, viewer, ErrorTag::GetPostError).await
        {
            Ok(post) => HttpMessage::ok(post),
            Err(failure) => failure,
        }
    }

    async fn get_feed(&self, request: FeedRequest, viewer: Option<UserId>) -> HttpMessage<FeedPage> {
        let page = match request.page().to_page_request() {
            Ok(page) => page,
            Err(message) => return HttpMessage::validation(message),
        };
        if let Some(message) = request.validation_failure() {
            return HttpMessage::validation(message);
        }

        debug!("Getting feed: limit={}, offset={}", page.limit, page.offset);

        let query = FeedQuery {
            viewer,
            community_id: request.community_id,
            author_id: request.author_id,
            search: non_blank(request.search.as_deref()).map(|term| term.trim().to_owned()),
            page,
        };
        match self.post_dao.find_feed(query).await {
            Ok(posts) => HttpMessage::ok(FeedPage::new(posts, page)),
            Err(e) => fallback(&e, ErrorTag::GetPostsError),
        }
    }

    async fn update_post(
        &self,
        post_id: PostId,
        user_id: UserId,
        request: UpdatePostRequest,
    ) -> HttpMessage<Post> {
        if let Some(message) = request.validation_failure() {
            return HttpMessage::validation(message);
        }
        if request.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return HttpMessage::validation("Content cannot be empty");
        }
        let changes = PostChanges::from(request);
        if changes.is_empty() {
            return HttpMessage::validation("At least one field must be provided");
        }

        debug!("Updating post {} for user {}", post_id, user_id);

        if let Err(failure) = self.find_owned(post_id, user_id, ErrorTag::UpdatePostError).await {
            return failure;
        }

        match self.post_dao.update(post_id, changes).await {
            Ok(post) => {
                info!("Post {} updated", post_id);
                HttpMessage::ok(post)
            }
            Err(e) if e.is(DaoErrorKind::NotFound) => {
                HttpMessage::not_found(POST_NOT_FOUND, ErrorTag::PostNotFound)
            }
            Err(e) => fallback(&e, ErrorTag::UpdatePostError),
        }
    }

    async fn delete_post(&self, post_id: PostId, user_id: UserId) -> HttpMessage<MessageResponse> {
        debug!("Deleting post {} for user {}", post_id, user_id);

        match self.post_dao.delete_owned(post_id, user_id).await {
            Ok(()) => {
                info!("Post {} deleted by user {}", post_id, user_id);
                HttpMessage::ok(MessageResponse::new("Post deleted successfully"))
            }
            Err(e) if e.is(DaoErrorKind::NotFound) => {
                HttpMessage::not_found(POST_NOT_FOUND, ErrorTag::PostNotFound)
            }
            Err(e) if e.is(DaoErrorKind::Forbidden) => HttpMessage::forbidden(
                "You can only delete your own posts",
                ErrorTag::Unauthorized,
            ),
            Err(e) => fallback(&e, ErrorTag::DeletePostError),
        }
    }

    async fn like_post(&self, request: LikePostRequest) -> HttpMessage<LikeResponse> {
        let action = non_blank(request.action.as_deref());
        let (Some(user_id), Some(post_id), Some(action)) = (request.user_id, request.post_id, action)
        else {
            return HttpMessage::validation("userId, postId and action are required");
        };
        let Some(action) = LikeAction::parse(action) else {
            return HttpMessage::validation("Action must be \"like\" or \"unlike\"");
        };

        debug!("User {} {:?} post {}", user_id, action, post_id);

        let tag = match action {
            LikeAction::Like => ErrorTag::LikeError,
            LikeAction::Unlike => ErrorTag::UnlikeError,
        };
        if let Err(failure) =
            find_visible_post::<LikeResponse>(self.post_dao.as_ref(), post_id, Some(user_id), tag).await
        {
            return failure;
        }

        match action {
            LikeAction::Like => match self.like_dao.create(user_id, post_id).await {
                Ok(_) => {
                    info!("User {} liked post {}", user_id, post_id);
                    record_side_interaction(
                        self.interaction_dao.as_ref(),
                        user_id,
                        Some(post_id),
                        None,
                        InteractionType::Like,
                    )
                    .await;
                }
                Err(e) if e.is(DaoErrorKind::AlreadyExists) => {
                    return HttpMessage::unprocessable("Post already liked", ErrorTag::AlreadyLiked);
                }
                // The post vanished after the lookup; the foreign key caught it.
                Err(e) if e.is(DaoErrorKind::NotFound) => {
                    return HttpMessage::not_found(POST_NOT_FOUND, ErrorTag::PostNotFound);
                }
                Err(e) => return fallback(&e, tag),
            },
            LikeAction::Unlike => {
                match self.like_dao.exists(user_id, post_id).await {
                    Ok(true) => {}
                    Ok(false) => return HttpMessage::unprocessable("Post is not liked", tag),
                    Err(e) => return fallback(&e, tag),
                }
                if let Err(e) = self.like_dao.delete(user_id, post_id).await {
                    return fallback(&e, tag);
                }
                info!("User {} unliked post {}", user_id, post_id);
            }
        }

        HttpMessage::ok(LikeResponse {
            action,
            post_id,
            user_id,
        })
    }
}
