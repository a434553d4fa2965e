//! Authentication service trait.

use crate::dto::{AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest};
use async_trait::async_trait;
use koinonia_core::{HttpMessage, KoinoniaResult, UserId};
use koinonia_security::Claims;

/// Registration, sessions and token checks.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Registers a new member and signs them in. 201 on success.
    async fn register(&self, request: RegisterRequest) -> HttpMessage<AuthResponse>;

    /// Signs a member in.
    async fn login(&self, request: LoginRequest) -> HttpMessage<AuthResponse>;

    /// Exchanges a refresh token for a new pair. The old refresh token stops working.
    async fn refresh_token(&self, request: RefreshTokenRequest) -> HttpMessage<AuthResponse>;

    /// Forgets the stored refresh token.
    async fn logout(&self, user_id: UserId) -> HttpMessage<MessageResponse>;

    /// Validates an access token and returns its claims.
    fn validate_token(&self, token: &str) -> KoinoniaResult<Claims>;
}
