//! User service trait.

use crate::dto::{UpdateProfileRequest, UserPage, UserProfile, UserSearchRequest};
use async_trait::async_trait;
use koinonia_core::{HttpMessage, UserId};

/// Member profiles.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_profile(&self, user_id: UserId) -> HttpMessage<UserProfile>;

    /// Pages through members newest first, optionally filtered by name.
    async fn list_users(&self, request: UserSearchRequest) -> HttpMessage<UserPage>;

    /// Updates the given fields of a member's own profile. A username held
    /// by someone else is 422 `USERNAME_TAKEN`.
    async fn update_profile(
        &self,
        user_id: UserId,
        request: UpdateProfileRequest,
    ) -> HttpMessage<UserProfile>;
}
