//! JWT token provider for creating and validating tokens.

use super::{Claims, ClaimsSubject, TokenType};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use koinonia_config::SecurityConfig;
use koinonia_core::{KoinoniaError, KoinoniaResult, UserId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Token pair containing access and refresh tokens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: i64,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: i64,
    /// Always "Bearer".
    pub token_type: String,
}

impl TokenPair {
    /// Refresh expiry as a timestamp, for persisting next to the token hash.
    #[must_use]
    pub fn refresh_expires_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.refresh_expires_at, 0).unwrap_or_else(Utc::now)
    }
}

/// JWT token provider service.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    /// Generates a token pair for a member.
    pub fn generate_tokens(
        &self,
        user_id: UserId,
        email: &str,
        name: &str,
    ) -> KoinoniaResult<TokenPair> {
        let now = Utc::now();
        let access_expires_at = now + Self::seconds(self.config.jwt_access_expiration_secs);
        let refresh_expires_at = now + Self::seconds(self.config.jwt_refresh_expiration_secs);

        let subject = ClaimsSubject {
            user_id,
            email,
            name,
            issuer: &self.config.jwt_issuer,
            audience: &self.config.jwt_audience,
        };

        let access_token = self.encode(&Claims::new(&subject, TokenType::Access, access_expires_at))?;
        let refresh_token =
            self.encode(&Claims::new(&subject, TokenType::Refresh, refresh_expires_at))?;

        debug!("Generated token pair for user {}", user_id);
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at: access_expires_at.timestamp(),
            refresh_expires_at: refresh_expires_at.timestamp(),
            token_type: "Bearer".to_string(),
        })
    }

    fn encode(&self, claims: &Claims) -> KoinoniaResult<String> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            KoinoniaError::Internal(format!("Failed to generate {} token: {e}", claims.token_type))
        })
    }

    fn seconds(secs: u64) -> Duration {
        Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000))
    }

    /// Validates a token and returns the claims.
    pub fn validate_token(&self, token: &str) -> KoinoniaResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                warn!("Token validation failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => KoinoniaError::TokenExpired,
                    ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                        KoinoniaError::InvalidToken("Invalid token signature".to_string())
                    }
                    ErrorKind::InvalidIssuer => {
                        KoinoniaError::InvalidToken("Invalid token issuer".to_string())
                    }
                    ErrorKind::InvalidAudience => {
                        KoinoniaError::InvalidToken("Invalid token audience".to_string())
                    }
                    _ => KoinoniaError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Validates an access token specifically.
    pub fn validate_access_token(&self, token: &str) -> KoinoniaResult<Claims> {
        let claims = self.validate_token(token)?;

        if !claims.is_access_token() {
            return Err(KoinoniaError::InvalidToken("Expected access token".to_string()));
        }

        Ok(claims)
    }

    /// Validates a refresh token specifically.
    pub fn validate_refresh_token(&self, token: &str) -> KoinoniaResult<Claims> {
        let claims = self.validate_token(token)?;

        if !claims.is_refresh_token() {
            return Err(KoinoniaError::InvalidToken("Expected refresh token".to_string()));
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider() -> TokenProvider {
        let config = SecurityConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            jwt_access_expiration_secs: 3600,
            jwt_refresh_expiration_secs: 86400,
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            ..Default::default()
        };
        TokenProvider::new(Arc::new(config))
    }

    #[test]
    fn test_generate_and_validate_tokens() {
        let provider = create_test_provider();
        let user_id = UserId::new();

        let tokens = provider
            .generate_tokens(user_id, "ruth@example.com", "Ruth")
            .unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert!(tokens.refresh_expires_at > tokens.access_expires_at);

        let claims = provider.validate_access_token(&tokens.access_token).unwrap();
        assert_eq!(claims.name, "Ruth");
        assert_eq!(claims.user_id(), Some(user_id));

        let refresh_claims = provider.validate_refresh_token(&tokens.refresh_token).unwrap();
        assert!(refresh_claims.is_refresh_token());
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let provider = create_test_provider();
        let tokens = provider
            .generate_tokens(UserId::new(), "ruth@example.com", "Ruth")
            .unwrap();

        assert!(provider.validate_access_token(&tokens.refresh_token).is_err());
        assert!(provider.validate_refresh_token(&tokens.access_token).is_err());
    }

    #[test]
    fn test_rejects_other_issuer() {
        let provider = create_test_provider();
        let other = TokenProvider::new(Arc::new(SecurityConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            jwt_issuer: "someone-else".to_string(),
            jwt_audience: "test-audience".to_string(),
            ..Default::default()
        }));
        let tokens = other
            .generate_tokens(UserId::new(), "ruth@example.com", "Ruth")
            .unwrap();

        assert!(matches!(
            provider.validate_access_token(&tokens.access_token),
            Err(KoinoniaError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_invalid_token() {
        let provider = create_test_provider();
        assert!(provider.validate_token("invalid-token").is_err());
    }
}
