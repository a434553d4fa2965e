//! Caller identity extractors.

use crate::responses::ApiRejection;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use koinonia_core::UserId;
use koinonia_security::Claims;
use std::convert::Infallible;

/// The signed-in caller. Rejects with 401 when the request carries no
/// valid access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub claims: Claims,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Claims are only present when the auth middleware accepted the token.
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(ApiRejection::unauthenticated)?;
        let user_id = claims.user_id().ok_or_else(ApiRejection::unauthenticated)?;

        Ok(Self { user_id, claims })
    }
}

/// The caller if signed in. Never rejects.
#[derive(Debug, Clone, Copy)]
pub struct OptionalUser(pub Option<UserId>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts.extensions.get::<Claims>().and_then(Claims::user_id);
        Ok(Self(user_id))
    }
}
