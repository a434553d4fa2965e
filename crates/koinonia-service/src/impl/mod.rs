//! Service implementations.

mod auth_service_impl;
mod comment_service_impl;
mod interaction_service_impl;
mod post_service_impl;
mod user_service_impl;

pub use auth_service_impl::AuthServiceImpl;
pub use comment_service_impl::CommentServiceImpl;
pub use interaction_service_impl::InteractionServiceImpl;
pub use post_service_impl::PostServiceImpl;
pub use user_service_impl::UserServiceImpl;

use koinonia_core::{
    CommentId, DaoError, DaoErrorKind, ErrorTag, HttpMessage, InteractionType, NewInteraction,
    PostId, UserId,
};
use koinonia_core::Post;
use koinonia_repository::{InteractionDao, PostDao};
use tracing::warn;

pub(crate) const POST_NOT_FOUND: &str = "Post not found";

/// Maps a DAO failure no operation-specific rule claimed.
///
/// An unreachable store is a 500; anything else is a 422 tagged with the
/// operation's error.
pub(crate) fn fallback<T>(err: &DaoError, tag: ErrorTag) -> HttpMessage<T> {
    if err.is(DaoErrorKind::Unavailable) {
        HttpMessage::server_error(err.message.clone())
    } else {
        HttpMessage::unprocessable(err.message.clone(), tag)
    }
}

/// Loads a post the viewer is allowed to see.
pub(crate) async fn find_visible_post<T>(
    dao: &dyn PostDao,
    post_id: PostId,
    viewer: Option<UserId>,
    tag: ErrorTag,
) -> Result<Post, HttpMessage<T>> {
    match dao.find_by_id(post_id).await {
        Ok(Some(post)) if post.is_visible_to(viewer) => Ok(post),
        Ok(Some(_)) => Err(HttpMessage::forbidden(
            "You do not have access to this post",
            ErrorTag::AccessDenied,
        )),
        Ok(None) => Err(HttpMessage::not_found(POST_NOT_FOUND, ErrorTag::PostNotFound)),
        Err(e) if e.is(DaoErrorKind::NotFound) => {
            Err(HttpMessage::not_found(POST_NOT_FOUND, ErrorTag::PostNotFound))
        }
        Err(e) => Err(fallback(&e, tag)),
    }
}

/// Records an engagement event as a side effect. Failures are logged only.
pub(crate) async fn record_side_interaction(
    dao: &dyn InteractionDao,
    user_id: UserId,
    post_id: Option<PostId>,
    comment_id: Option<CommentId>,
    interaction_type: InteractionType,
) {
    let interaction = NewInteraction {
        user_id,
        post_id,
        comment_id,
        interaction_type,
        duration: None,
    };
    if let Err(e) = dao.create(interaction).await {
        warn!("Failed to record {} interaction for user {}: {}", interaction_type, user_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_unavailable_is_server_error() {
        let message: HttpMessage<()> =
            fallback(&DaoError::unavailable("Database unavailable"), ErrorTag::LikeError);
        assert_eq!(message.status_code(), 500);
        assert_eq!(message.error(), Some(ErrorTag::ServerError));
    }

    #[test]
    fn test_fallback_other_kinds_use_operation_tag() {
        let message: HttpMessage<()> =
            fallback(&DaoError::store("Failed to create like."), ErrorTag::LikeError);
        assert_eq!(message.status_code(), 422);
        assert_eq!(message.error(), Some(ErrorTag::LikeError));
        assert_eq!(message.message(), Some("Failed to create like."));
    }
}
