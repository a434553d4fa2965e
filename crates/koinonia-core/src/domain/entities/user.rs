//! User entity.

use crate::{Email, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A registered member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,

    /// Argon2 hash; never exposed via API.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Display name.
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub profile_image_url: Option<String>,
    pub denomination: Option<String>,
    pub bio: Option<String>,
    pub favorite_verse: Option<String>,
    pub is_verified: bool,

    /// Consecutive failed logins since the last success.
    #[serde(skip_serializing, default)]
    pub failed_login_attempts: i32,
    #[serde(skip_serializing, default)]
    pub locked_until: Option<DateTime<Utc>>,

    /// Argon2 hash of the current refresh token.
    #[serde(skip_serializing, default)]
    pub refresh_token_hash: Option<String>,
    #[serde(skip_serializing, default)]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,

    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a fresh, unverified account.
    #[must_use]
    pub fn new(email: Email, password_hash: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            password_hash,
            name,
            first_name: None,
            last_name: None,
            username: None,
            profile_image_url: None,
            denomination: None,
            bio: None,
            favorite_verse: None,
            is_verified: false,
            failed_login_attempts: 0,
            locked_until: None,
            refresh_token_hash: None,
            refresh_token_expires_at: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true while a lockout window is open.
    #[must_use]
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Computes the counter and lockout after one more failed login.
    ///
    /// Reaching `threshold` consecutive failures locks the account for
    /// `lockout` and resets the counter.
    #[must_use]
    pub fn next_failure_state(
        &self,
        threshold: u32,
        lockout: Duration,
        now: DateTime<Utc>,
    ) -> (i32, Option<DateTime<Utc>>) {
        let attempts = self.failed_login_attempts.saturating_add(1);
        if u32::try_from(attempts).unwrap_or(0) >= threshold {
            (0, Some(now + lockout))
        } else {
            (attempts, None)
        }
    }

    /// Compact author view embedded in posts and comments.
    #[must_use]
    pub fn author_summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            name: self.name.clone(),
            username: self.username.clone(),
            profile_image_url: self.profile_image_url.clone(),
        }
    }
}

/// Public author fields shown next to content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: UserId,
    pub name: String,
    pub username: Option<String>,
    pub profile_image_url: Option<String>,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// Partial profile update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub profile_image_url: Option<String>,
    pub denomination: Option<String>,
    pub bio: Option<String>,
    pub favorite_verse: Option<String>,
}

impl ProfileChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.username.is_none()
            && self.profile_image_url.is_none()
            && self.denomination.is_none()
            && self.bio.is_none()
            && self.favorite_verse.is_none()
    }

    /// Applies the changes in place and bumps `updated_at`.
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(v) = &self.first_name {
            user.first_name = Some(v.clone());
        }
        if let Some(v) = &self.last_name {
            user.last_name = Some(v.clone());
        }
        if let Some(v) = &self.username {
            user.username = Some(v.clone());
        }
        if let Some(v) = &self.profile_image_url {
            user.profile_image_url = Some(v.clone());
        }
        if let Some(v) = &self.denomination {
            user.denomination = Some(v.clone());
        }
        if let Some(v) = &self.bio {
            user.bio = Some(v.clone());
        }
        if let Some(v) = &self.favorite_verse {
            user.favorite_verse = Some(v.clone());
        }
        user.updated_at = Utc::now();
    }
}
