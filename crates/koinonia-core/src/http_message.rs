//! HTTP response envelope produced by the service layer.
//!
//! An [`HttpMessage`] is built once per request through one of its
//! constructors and handed to the HTTP layer, which serializes it as
//! `{ httpStatusCode, data: { success, message?, content?, error? } }`.
//! There is no way to mutate one after construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable failure tag carried in `data.error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorTag {
    ValidationError,
    ServerError,
    PostNotFound,
    CommentNotFound,
    UserNotFound,
    Unauthorized,
    AccessDenied,
    AlreadyLiked,
    LikeError,
    UnlikeError,
    CreatePostError,
    UpdatePostError,
    DeletePostError,
    GetPostError,
    GetPostsError,
    CreateCommentError,
    UpdateCommentError,
    DeleteCommentError,
    GetCommentError,
    GetCommentsError,
    InteractionError,
    EmailTaken,
    UsernameTaken,
    RegisterError,
    LoginError,
    LogoutError,
    AccountLocked,
    InvalidToken,
    GetProfileError,
    UpdateProfileError,
    GetUsersError,
    UserNotAuthenticated,
    UnauthorizedAccess,
}

impl ErrorTag {
    /// Returns the wire representation of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ServerError => "SERVER_ERROR",
            Self::PostNotFound => "POST_NOT_FOUND",
            Self::CommentNotFound => "COMMENT_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::AlreadyLiked => "ALREADY_LIKED",
            Self::LikeError => "LIKE_ERROR",
            Self::UnlikeError => "UNLIKE_ERROR",
            Self::CreatePostError => "CREATE_POST_ERROR",
            Self::UpdatePostError => "UPDATE_POST_ERROR",
            Self::DeletePostError => "DELETE_POST_ERROR",
            Self::GetPostError => "GET_POST_ERROR",
            Self::GetPostsError => "GET_POSTS_ERROR",
            Self::CreateCommentError => "CREATE_COMMENT_ERROR",
            Self::UpdateCommentError => "UPDATE_COMMENT_ERROR",
            Self::DeleteCommentError => "DELETE_COMMENT_ERROR",
            Self::GetCommentError => "GET_COMMENT_ERROR",
            Self::GetCommentsError => "GET_COMMENTS_ERROR",
            Self::InteractionError => "INTERACTION_ERROR",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::RegisterError => "REGISTER_ERROR",
            Self::LoginError => "LOGIN_ERROR",
            Self::LogoutError => "LOGOUT_ERROR",
            Self::AccountLocked => "ACCOUNT_LOCKED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::GetProfileError => "GET_PROFILE_ERROR",
            Self::UpdateProfileError => "UPDATE_PROFILE_ERROR",
            Self::GetUsersError => "GET_USERS_ERROR",
            Self::UserNotAuthenticated => "USER_NOT_AUTHENTICATED",
            Self::UnauthorizedAccess => "UNAUTHORIZED_ACCESS",
        }
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inner `data` object of the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorTag>,
}

/// Status-tagged response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpMessage<T> {
    http_status_code: u16,
    data: ResponseBody<T>,
}

impl<T> HttpMessage<T> {
    fn success(status: u16, content: T) -> Self {
        Self {
            http_status_code: status,
            data: ResponseBody {
                success: true,
                message: None,
                content: Some(content),
                error: None,
            },
        }
    }

    /// Builds a failure envelope with an arbitrary status.
    #[must_use]
    pub fn failure(status: u16, message: impl Into<String>, tag: ErrorTag) -> Self {
        Self {
            http_status_code: status,
            data: ResponseBody {
                success: false,
                message: Some(message.into()),
                content: None,
                error: Some(tag),
            },
        }
    }

    /// 200 with content.
    #[must_use]
    pub fn ok(content: T) -> Self {
        Self::success(200, content)
    }

    /// 201 with content.
    #[must_use]
    pub fn created(content: T) -> Self {
        Self::success(201, content)
    }

    /// 401.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>, tag: ErrorTag) -> Self {
        Self::failure(401, message, tag)
    }

    /// 403.
    #[must_use]
    pub fn forbidden(message: impl Into<String>, tag: ErrorTag) -> Self {
        Self::failure(403, message, tag)
    }

    /// 404.
    #[must_use]
    pub fn not_found(message: impl Into<String>, tag: ErrorTag) -> Self {
        Self::failure(404, message, tag)
    }

    /// 422.
    #[must_use]
    pub fn unprocessable(message: impl Into<String>, tag: ErrorTag) -> Self {
        Self::failure(422, message, tag)
    }

    /// 422 tagged `VALIDATION_ERROR`.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::unprocessable(message, ErrorTag::ValidationError)
    }

    /// 500 tagged `SERVER_ERROR`.
    #[must_use]
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::failure(500, message, ErrorTag::ServerError)
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.http_status_code
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.data.success
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.data.message.as_deref()
    }

    #[must_use]
    pub const fn content(&self) -> Option<&T> {
        self.data.content.as_ref()
    }

    #[must_use]
    pub const fn error(&self) -> Option<ErrorTag> {
        self.data.error
    }

    /// Consumes the envelope, returning the status and body.
    #[must_use]
    pub fn into_parts(self) -> (u16, ResponseBody<T>) {
        (self.http_status_code, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_created_shape() {
        let msg = HttpMessage::created(json!({"id": "p1"}));
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "httpStatusCode": 201,
                "data": {"success": true, "content": {"id": "p1"}}
            })
        );
    }

    #[test]
    fn test_validation_shape() {
        let msg = HttpMessage::<()>::validation("Content and authorId are required");
        assert_eq!(msg.status_code(), 422);
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "httpStatusCode": 422,
                "data": {
                    "success": false,
                    "message": "Content and authorId are required",
                    "error": "VALIDATION_ERROR"
                }
            })
        );
    }

    #[test]
    fn test_constructor_statuses() {
        assert_eq!(HttpMessage::ok(1).status_code(), 200);
        assert_eq!(HttpMessage::<()>::unauthorized("x", ErrorTag::InvalidToken).status_code(), 401);
        assert_eq!(HttpMessage::<()>::forbidden("x", ErrorTag::AccessDenied).status_code(), 403);
        assert_eq!(HttpMessage::<()>::not_found("x", ErrorTag::PostNotFound).status_code(), 404);
        assert_eq!(HttpMessage::<()>::server_error("x").error(), Some(ErrorTag::ServerError));
    }

    #[test]
    fn test_tag_serialization_matches_as_str() {
        for tag in [
            ErrorTag::AlreadyLiked,
            ErrorTag::GetCommentsError,
            ErrorTag::UserNotAuthenticated,
            ErrorTag::UnauthorizedAccess,
            ErrorTag::UsernameTaken,
        ] {
            assert_eq!(serde_json::to_value(tag).unwrap(), json!(tag.as_str()));
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Verse {
        reference: String,
    }

    #[test]
    fn test_envelope_round_trips_content_without_default() {
        let raw = json!({
            "httpStatusCode": 200,
            "data": {"success": true, "content": {"reference": "John 1:1"}}
        });
        let msg: HttpMessage<Verse> = serde_json::from_value(raw).unwrap();
        assert!(msg.is_success());
        assert_eq!(msg.content().map(|v| v.reference.as_str()), Some("John 1:1"));
        assert!(msg.message().is_none());

        let failure: HttpMessage<Verse> = serde_json::from_value(json!({
            "httpStatusCode": 404,
            "data": {"success": false, "message": "Post not found", "error": "POST_NOT_FOUND"}
        }))
        .unwrap();
        assert_eq!(failure.error(), Some(ErrorTag::PostNotFound));
        assert!(failure.content().is_none());
    }
}
