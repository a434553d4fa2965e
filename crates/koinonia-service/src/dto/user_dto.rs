//! Profile DTOs.

use super::PageQuery;
use koinonia_core::{rules, PageRequest, Pagination, ProfileChanges, User};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Partial profile update for the signed-in member.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
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

    #[validate(url(message = "Invalid profile image URL"))]
    pub profile_image_url: Option<String>,

    #[validate(length(max = 100, message = "Denomination is too long (max 100 characters)"))]
    pub denomination: Option<String>,

    #[validate(length(max = 500, message = "Bio is too long (max 500 characters)"))]
    pub bio: Option<String>,

    #[validate(length(max = 500, message = "Favorite verse is too long (max 500 characters)"))]
    pub favorite_verse: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            name: request.name.map(|n| n.trim().to_string()),
            first_name: request.first_name,
            last_name: request.last_name,
            username: request.username,
            profile_image_url: request.profile_image_url,
            denomination: request.denomination,
            bio: request.bio,
            favorite_verse: request.favorite_verse,
        }
    }
}

/// Public profile with activity counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub post_count: i64,
}

/// Member directory query parameters.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserSearchRequest {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    #[validate(length(max = 100, message = "Search term is too long (max 100 characters)"))]
    pub search: Option<String>,
}

impl UserSearchRequest {
    #[must_use]
    pub const fn page(&self) -> PageQuery {
        PageQuery {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// One page of the member directory.
#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

impl UserPage {
    #[must_use]
    pub fn new(users: Vec<User>, page: PageRequest) -> Self {
        let pagination = Pagination::for_page(page, users.len());
        Self { users, pagination }
    }
}
