//! Authentication service implementation.

use super::fallback;
use crate::dto::{AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest};
use crate::AuthService;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use koinonia_config::SecurityConfig;
use koinonia_core::{
    non_blank, DaoError, DaoErrorKind, Email, ErrorTag, HttpMessage, KoinoniaResult, NewUser,
    UniqueKey, User, UserId, ValidateExt,
};
use koinonia_repository::UserDao;
use koinonia_security::{Claims, PasswordHasher, TokenProvider};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type StoreFailure = fn(&DaoError, ErrorTag) -> HttpMessage<AuthResponse>;

fn invalid_credentials<T>() -> HttpMessage<T> {
    HttpMessage::unauthorized("Invalid email or password", ErrorTag::Unauthorized)
}

fn invalid_token<T>() -> HttpMessage<T> {
    HttpMessage::unauthorized("Invalid or expired refresh token", ErrorTag::InvalidToken)
}

/// Store failures during sign-in answer 401, except an unreachable store.
fn auth_fallback<T>(err: &DaoError, tag: ErrorTag) -> HttpMessage<T> {
    if err.is(DaoErrorKind::Unavailable) {
        HttpMessage::server_error(err.message.clone())
    } else {
        HttpMessage::unauthorized(err.message.clone(), tag)
    }
}

/// Authentication service backed by the user DAO.
pub struct AuthServiceImpl {
    user_dao: Arc<dyn UserDao>,
    password_hasher: Arc<PasswordHasher>,
    token_provider: Arc<TokenProvider>,
    security_config: Arc<SecurityConfig>,
}

impl AuthServiceImpl {
    /// Creates a new authentication service.
    pub fn new(
        user_dao: Arc<dyn UserDao>,
        password_hasher: Arc<PasswordHasher>,
        security_config: Arc<SecurityConfig>,
    ) -> Self {
        let token_provider = Arc::new(TokenProvider::new(Arc::clone(&security_config)));
        Self {
            user_dao,
            password_hasher,
            token_provider,
            security_config,
        }
    }

    /// Issues a token pair and stores the hash of its refresh token.
    async fn open_session(
        &self,
        mut user: User,
        tag: ErrorTag,
        on_store_error: StoreFailure,
    ) -> Result<AuthResponse, HttpMessage<AuthResponse>> {
        let tokens = self
            .token_provider
            .generate_tokens(user.id, user.email.as_str(), &user.name)
            .map_err(|e| {
                error!("Failed to issue tokens for user {}: {}", user.id, e);
                HttpMessage::server_error("Failed to issue tokens")
            })?;
        let refresh_hash = self.password_hasher.hash(&tokens.refresh_token).map_err(|e| {
            error!("Failed to hash refresh token for user {}: {}", user.id, e);
            HttpMessage::server_error("Failed to issue tokens")
        })?;

        self.user_dao
            .record_login_success(user.id, refresh_hash, tokens.refresh_expires_at_utc())
            .await
            .map_err(|e| on_store_error(&e, tag))?;

        let now = Utc::now();
        user.last_login_at = Some(now);
        Ok(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.access_expires_at - now.timestamp(),
            user,
        })
    }

    async fn record_failure(&self, user: &User, now: DateTime<Utc>) {
        let lockout = Duration::minutes(i64::from(self.security_config.lockout_minutes));
        let (attempts, locked_until) =
            user.next_failure_state(self.security_config.max_failed_logins, lockout, now);

        match locked_until {
            Some(until) => warn!("Account {} locked until {}", user.id, until),
            None => warn!("Failed login for user {} (attempt {})", user.id, attempts),
        }

        if let Err(e) = self
            .user_dao
            .record_login_failure(user.id, attempts, locked_until)
            .await
        {
            warn!("Failed to record login failure for user {}: {}", user.id, e);
        }
    }

    /// True when `token` is the refresh token last issued to the member.
    fn is_current_refresh_token(&self, user: &User, token: &str, now: DateTime<Utc>) -> bool {
        match (&user.refresh_token_hash, user.refresh_token_expires_at) {
            (Some(hash), Some(expires_at)) if expires_at > now => {
                self.password_hasher.verify(token, hash).unwrap_or(false)
            }
            _ => false,
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, request: RegisterRequest) -> HttpMessage<AuthResponse> {
        let (Some(email), Some(password), Some(name)) = (
            non_blank(request.email.as_deref()),
            non_blank(request.password.as_deref()),
            non_blank(request.name.as_deref()),
        ) else {
            return HttpMessage::validation("Email, password and name are required");
        };
        if let Some(message) = request.validation_failure() {
            return HttpMessage::validation(message);
        }
        let email = match Email::new(email) {
            Ok(email) => email,
            Err(e) => return HttpMessage::validation(e.to_string()),
        };

        debug!("Registering user: {}", email);

        let password_hash = match self.password_hasher.hash(password) {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to hash password: {}", e);
                return HttpMessage::server_error("Failed to register");
            }
        };

        let new_user = NewUser {
            email,
            password_hash,
            name: name.trim().to_string(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            username: request.username.clone(),
        };
        let user = match self.user_dao.create(new_user).await {
            Ok(user) => user,
            Err(e) if e.is_duplicate(UniqueKey::Username) => {
                return HttpMessage::unprocessable(e.message, ErrorTag::UsernameTaken);
            }
            Err(e) if e.is(DaoErrorKind::AlreadyExists) => {
                return HttpMessage::unprocessable(e.message, ErrorTag::EmailTaken);
            }
            Err(e) => return fallback(&e, ErrorTag::RegisterError),
        };

        info!("User registered: {}", user.id);

        match self.open_session(user, ErrorTag::RegisterError, fallback).await {
            Ok(response) => HttpMessage::created(response),
            Err(failure) => failure,
        }
    }

    async fn login(&self, request: LoginRequest) -> HttpMessage<AuthResponse> {
        let (Some(email), Some(password)) = (
            non_blank(request.email.as_deref()),
            non_blank(request.password.as_deref()),
        ) else {
            return HttpMessage::unprocessable("Email and password are required", ErrorTag::LoginError);
        };

        debug!("Login attempt for: {}", email);

        let Ok(email) = Email::new(email) else {
            return invalid_credentials();
        };
        let user = match self.user_dao.find_by_email(&email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Login failed: unknown email {}", email);
                return invalid_credentials();
            }
            Err(e) => return auth_fallback(&e, ErrorTag::LoginError),
        };

        let now = Utc::now();
        if user.is_locked(now) {
            warn!("Login rejected: account {} is locked", user.id);
            return HttpMessage::unauthorized(
                "Account is locked. Try again later",
                ErrorTag::AccountLocked,
            );
        }

        match self.password_hasher.verify(password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                self.record_failure(&user, now).await;
                return invalid_credentials();
            }
            Err(e) => {
                error!("Password verification failed for user {}: {}", user.id, e);
                return HttpMessage::server_error("Failed to sign in");
            }
        }

        info!("User logged in: {}", user.id);

        match self.open_session(user, ErrorTag::LoginError, auth_fallback).await {
            Ok(response) => HttpMessage::ok(response),
            Err(failure) => failure,
        }
    }

    async fn refresh_token(&self, request: RefreshTokenRequest) -> HttpMessage<AuthResponse> {
        let Some(token) = non_blank(request.refresh_token.as_deref()) else {
            return HttpMessage::validation("refreshToken is required");
        };

        debug!("Refreshing token");

        let claims = match self.token_provider.validate_refresh_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Refresh rejected: {}", e);
                return invalid_token();
            }
        };
        let Some(user_id) = claims.user_id() else {
            return invalid_token();
        };

        let user = match self.user_dao.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return invalid_token(),
            Err(e) => return auth_fallback(&e, ErrorTag::InvalidToken),
        };

        if !self.is_current_refresh_token(&user, token, Utc::now()) {
            warn!("Refresh rejected: token for user {} is not current", user.id);
            return invalid_token();
        }

        match self.open_session(user, ErrorTag::InvalidToken, auth_fallback).await {
            Ok(response) => {
                info!("Token refreshed for user {}", user_id);
                HttpMessage::ok(response)
            }
            Err(failure) => failure,
        }
    }

    async fn logout(&self, user_id: UserId) -> HttpMessage<MessageResponse> {
        debug!("Logging out user {}", user_id);

        match self.user_dao.clear_refresh_token(user_id).await {
            Ok(()) => {
                info!("User logged out: {}", user_id);
                HttpMessage::ok(MessageResponse::new("Logged out successfully"))
            }
            Err(e) => fallback(&e, ErrorTag::LogoutError),
        }
    }

    fn validate_token(&self, token: &str) -> KoinoniaResult<Claims> {
        self.token_provider.validate_access_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use koinonia_repository::{MemoryStore, MockUserDao};

    fn service_with(user_dao: Arc<dyn UserDao>) -> AuthServiceImpl {
        AuthServiceImpl::new(
            user_dao,
            Arc::new(PasswordHasher::with_cost(1)),
            Arc::new(SecurityConfig::default()),
        )
    }

    fn memory_service() -> (Arc<MemoryStore>, AuthServiceImpl) {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store.clone());
        (store, service)
    }

    fn registration() -> RegisterRequest {
        RegisterRequest {
            email: Some("Lydia@Example.com".to_string()),
            password: Some("purple-cloth-seller".to_string()),
            name: Some("Lydia".to_string()),
            username: Some("lydia".to_string()),
            ..RegisterRequest::default()
        }
    }

    fn login(password: &str) -> LoginRequest {
        LoginRequest {
            email: Some("lydia@example.com".to_string()),
            password: Some(password.to_string()),
        }
    }

    fn refresh(token: &str) -> RefreshTokenRequest {
        RefreshTokenRequest {
            refresh_token: Some(token.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_issues_tokens() {
        let (_, service) = memory_service();

        let response = service.register(registration()).await;

        assert_eq!(response.status_code(), 201);
        let auth = response.content().unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.user.email.as_str(), "lydia@example.com");
        assert!(auth.expires_in > 0);

        let claims = service.validate_token(&auth.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(auth.user.id));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_taken() {
        let (_, service) = memory_service();
        service.register(registration()).await;

        let mut again = registration();
        again.username = None;
        let response = service.register(again).await;

        assert_eq!(response.status_code(), 422);
        assert_eq!(response.error(), Some(ErrorTag::EmailTaken));
        assert_eq!(response.message(), Some("Email already registered"));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_is_taken() {
        let (_, service) = memory_service();
        service.register(registration()).await;

        let mut again = registration();
        again.email = Some("thyatira@example.com".to_string());
        again.username = Some("LYDIA".to_string());
        let response = service.register(again).await;

        assert_eq!(response.status_code(), 422);
        assert_eq!(response.error(), Some(ErrorTag::UsernameTaken));
        assert_eq!(response.message(), Some("Username already taken"));
    }

    #[tokio::test]
    async fn test_register_validation_makes_no_dao_call() {
        let mut user_dao = MockUserDao::new();
        user_dao.expect_create().times(0);
        let service = service_with(Arc::new(user_dao));

        let missing = service
            .register(RegisterRequest {
                name: None,
                ..registration()
            })
            .await;
        assert_eq!(missing.status_code(), 422);
        assert_eq!(missing.message(), Some("Email, password and name are required"));

        let weak = service
            .register(RegisterRequest {
                password: Some("short".to_string()),
                ..registration()
            })
            .await;
        assert_eq!(weak.error(), Some(ErrorTag::ValidationError));
    }

    #[tokio::test]
    async fn test_login_success_and_bad_password() {
        let (_, service) = memory_service();
        service.register(registration()).await;

        let ok = service.login(login("purple-cloth-seller")).await;
        assert_eq!(ok.status_code(), 200);
        assert!(ok.content().unwrap().user.last_login_at.is_some());

        let bad = service.login(login("wrong-password")).await;
        assert_eq!(bad.status_code(), 401);
        assert_eq!(bad.error(), Some(ErrorTag::Unauthorized));

        let unknown = service
            .login(LoginRequest {
                email: Some("nobody@example.com".to_string()),
                password: Some("whatever123".to_string()),
            })
            .await;
        assert_eq!(unknown.status_code(), 401);
    }

    #[tokio::test]
    async fn test_login_missing_fields() {
        let mut user_dao = MockUserDao::new();
        user_dao.expect_find_by_email().times(0);
        let service = service_with(Arc::new(user_dao));

        let response = service.login(LoginRequest::default()).await;
        assert_eq!(response.status_code(), 422);
        assert_eq!(response.error(), Some(ErrorTag::LoginError));
    }

    #[tokio::test]
    async fn test_account_locks_after_five_failures() {
        let (_, service) = memory_service();
        service.register(registration()).await;

        for _ in 0..5 {
            let response = service.login(login("wrong-password")).await;
            assert_eq!(response.error(), Some(ErrorTag::Unauthorized));
        }

        let locked = service.login(login("purple-cloth-seller")).await;
        assert_eq!(locked.status_code(), 401);
        assert_eq!(locked.error(), Some(ErrorTag::AccountLocked));
    }

    #[tokio::test]
    async fn test_successful_login_resets_failure_count() {
        let (store, service) = memory_service();
        let user_id = service.register(registration()).await.content().unwrap().user.id;

        for _ in 0..4 {
            service.login(login("wrong-password")).await;
        }
        assert_eq!(service.login(login("purple-cloth-seller")).await.status_code(), 200);

        let user = UserDao::find_by_id(store.as_ref(), user_id).await.unwrap().unwrap();
        assert_eq!(user.failed_login_attempts, 0);
        assert!(user.locked_until.is_none());
    }

    #[tokio::test]
    async fn test_refresh_rotation_invalidates_old_token() {
        let (_, service) = memory_service();
        let first = service.register(registration()).await;
        let old_token = first.content().unwrap().refresh_token.clone();

        let rotated = service.refresh_token(refresh(&old_token)).await;
        assert_eq!(rotated.status_code(), 200);
        let new_token = rotated.content().unwrap().refresh_token.clone();
        assert_ne!(new_token, old_token);

        let replay = service.refresh_token(refresh(&old_token)).await;
        assert_eq!(replay.status_code(), 401);
        assert_eq!(replay.error(), Some(ErrorTag::InvalidToken));

        assert_eq!(service.refresh_token(refresh(&new_token)).await.status_code(), 200);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token_and_logged_out_session() {
        let (_, service) = memory_service();
        let registered = service.register(registration()).await;
        let auth = registered.content().unwrap();

        let wrong_kind = service.refresh_token(refresh(&auth.access_token)).await;
        assert_eq!(wrong_kind.error(), Some(ErrorTag::InvalidToken));

        assert_eq!(service.logout(auth.user.id).await.status_code(), 200);
        let after_logout = service.refresh_token(refresh(&auth.refresh_token)).await;
        assert_eq!(after_logout.status_code(), 401);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_server_error() {
        let (store, service) = memory_service();
        store.set_available(false);

        let response = service.login(login("purple-cloth-seller")).await;
        assert_eq!(response.status_code(), 500);
        assert_eq!(response.error(), Some(ErrorTag::ServerError));
    }
}
