//! UserDao trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use koinonia_core::{DaoResult, Email, NewUser, PageRequest, ProfileChanges, User, UserId};

/// Data access for member accounts.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UserDao: Send + Sync {
    /// Inserts a user. A taken email or username is `AlreadyExists`.
    async fn create(&self, user: NewUser) -> DaoResult<User>;

    async fn find_by_id(&self, id: UserId) -> DaoResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> DaoResult<Option<User>>;

    /// Lists members newest first, optionally keeping only those whose
    /// name, first name, last name or username contains `term`
    /// case-insensitively.
    async fn search(&self, term: Option<String>, page: PageRequest) -> DaoResult<Vec<User>>;

    /// Applies a partial profile update.
    async fn update_profile(&self, id: UserId, changes: ProfileChanges) -> DaoResult<User>;

    /// Stores the failure counter and lockout computed by the caller.
    async fn record_login_failure(
        &self,
        id: UserId,
        attempts: i32,
        locked_until: Option<DateTime<Utc>>,
    ) -> DaoResult<()>;

    /// Resets the failure counter, stamps `last_login_at` and stores the
    /// hash of the newly issued refresh token.
    async fn record_login_success(
        &self,
        id: UserId,
        refresh_token_hash: String,
        refresh_expires_at: DateTime<Utc>,
    ) -> DaoResult<()>;

    /// Forgets the stored refresh token.
    async fn clear_refresh_token(&self, id: UserId) -> DaoResult<()>;
}
