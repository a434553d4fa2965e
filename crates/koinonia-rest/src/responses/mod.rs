//! Rendering of response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use koinonia_core::{ErrorTag, HttpMessage};
use serde::Serialize;

/// A service envelope on its way out.
///
/// `httpStatusCode` becomes the status line and the inner `data` object
/// becomes the body.
#[derive(Debug)]
pub struct ApiReply<T>(pub HttpMessage<T>);

impl<T> From<HttpMessage<T>> for ApiReply<T> {
    fn from(message: HttpMessage<T>) -> Self {
        Self(message)
    }
}

impl<T: Serialize> IntoResponse for ApiReply<T> {
    fn into_response(self) -> Response {
        let (status, body) = self.0.into_parts();
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

/// A request turned away before it reached a service.
#[derive(Debug)]
pub struct ApiRejection(HttpMessage<()>);

impl ApiRejection {
    /// 422 `VALIDATION_ERROR`.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(HttpMessage::validation(message))
    }

    /// 401 `USER_NOT_AUTHENTICATED`.
    pub fn unauthenticated() -> Self {
        Self(HttpMessage::unauthorized(
            "Unauthorized",
            ErrorTag::UserNotAuthenticated,
        ))
    }

    /// 500 `SERVER_ERROR`.
    pub fn server_error() -> Self {
        Self(HttpMessage::server_error("Internal server error"))
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        ApiReply(self.0).into_response()
    }
}
