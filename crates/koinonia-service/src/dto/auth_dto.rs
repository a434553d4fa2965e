//! Authentication DTOs.

use koinonia_core::{rules, User};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a new member.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,

    #[validate(length(max = 100, message = "Name is too long (max 100 characters)"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "First name is too long (max 100 characters)"))]
    pub first_name: Option<String>,

    #[validate(length(max = 100, message = "Last name is too long (max 100 characters)"))]
    pub last_name: Option<String>,

    #[validate(custom(
        function = "rules::valid_username",
        message = "Username must be 3-32 letters, digits, '_' or '-' and start with a letter"
    ))]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

/// Tokens plus the signed-in member.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use koinonia_core::ValidateExt;

    fn valid() -> RegisterRequest {
        RegisterRequest {
            email: Some("phoebe@example.com".to_string()),
            password: Some("correct horse".to_string()),
            name: Some("Phoebe".to_string()),
            ..RegisterRequest::default()
        }
    }

    #[test]
    fn test_valid_register_request() {
        assert!(valid().validation_failure().is_none());
    }

    #[test]
    fn test_short_password() {
        let request = RegisterRequest {
            password: Some("short".to_string()),
            ..valid()
        };
        assert_eq!(
            request.validation_failure().as_deref(),
            Some("Password must be 8-128 characters")
        );
    }

    #[test]
    fn test_bad_username() {
        let request = RegisterRequest {
            username: Some("9lives".to_string()),
            ..valid()
        };
        assert!(request.validation_failure().unwrap().starts_with("Username must be"));
    }
}
