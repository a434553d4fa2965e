//! JWT claims structure.

use chrono::{DateTime, Utc};
use koinonia_core::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,

    /// User ID as UUID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,

    /// Member's email.
    pub email: String,

    /// Display name.
    pub name: String,

    /// Token type (access or refresh).
    pub token_type: TokenType,

    /// Issued at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,

    /// Not before timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// JWT ID (unique identifier for this token).
    pub jti: String,
}

/// Identity and issuer fields shared by both token kinds.
#[derive(Debug, Clone)]
pub struct ClaimsSubject<'a> {
    pub user_id: UserId,
    pub email: &'a str,
    pub name: &'a str,
    pub issuer: &'a str,
    pub audience: &'a str,
}

impl Claims {
    /// Creates claims of the given type expiring at `expires_at`.
    #[must_use]
    pub fn new(subject: &ClaimsSubject<'_>, token_type: TokenType, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.user_id.to_string(),
            user_id: Some(subject.user_id.into_inner()),
            email: subject.email.to_string(),
            name: subject.name.to_string(),
            token_type,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            nbf: Some(now.timestamp()),
            iss: subject.issuer.to_string(),
            aud: subject.audience.to_string(),
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Returns the user ID, falling back to parsing `sub`.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
            .map(UserId::from_uuid)
            .or_else(|| self.sub.parse().ok())
    }

    /// Checks if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration time.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    #[must_use]
    pub const fn is_access_token(&self) -> bool {
        matches!(self.token_type, TokenType::Access)
    }

    #[must_use]
    pub const fn is_refresh_token(&self) -> bool {
        matches!(self.token_type, TokenType::Refresh)
    }
}

/// Token type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived, sent with API requests.
    Access,
    /// Long-lived, exchanged for a new pair.
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn subject(user_id: UserId) -> ClaimsSubject<'static> {
        ClaimsSubject {
            user_id,
            email: "ruth@example.com",
            name: "Ruth",
            issuer: "issuer",
            audience: "audience",
        }
    }

    #[test]
    fn test_access_token_claims() {
        let user_id = UserId::new();
        let claims = Claims::new(
            &subject(user_id),
            TokenType::Access,
            Utc::now() + Duration::hours(1),
        );

        assert!(claims.is_access_token());
        assert!(!claims.is_refresh_token());
        assert!(!claims.is_expired());
        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn test_serialized_token_type() {
        let claims = Claims::new(
            &subject(UserId::new()),
            TokenType::Refresh,
            Utc::now() + Duration::hours(1),
        );
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["token_type"], "refresh");
        assert_eq!(json["name"], "Ruth");
    }
}
