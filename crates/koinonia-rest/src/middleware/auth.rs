//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use koinonia_service::AuthService;
use std::sync::Arc;
use tracing::debug;

/// Authentication middleware state.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub auth_service: Arc<dyn AuthService>,
}

impl AuthMiddlewareState {
    pub fn new(auth_service: Arc<dyn AuthService>) -> Self {
        Self { auth_service }
    }
}

/// Validates a bearer access token and stores its claims in the request
/// extensions.
///
/// Never rejects: routes that need a caller ask for
/// [`AuthenticatedUser`](crate::extractors::AuthenticatedUser).
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = token {
        match state.auth_service.validate_token(token) {
            Ok(claims) => {
                debug!("Authenticated user: {}", claims.sub);
                request.extensions_mut().insert(claims);
            }
            Err(e) => debug!("Token validation failed: {}", e),
        }
    }

    next.run(request).await
}
