//! User service implementation.

use super::fallback;
use crate::dto::{UpdateProfileRequest, UserPage, UserProfile, UserSearchRequest};
use crate::UserService;
use async_trait::async_trait;
use koinonia_core::{
    non_blank, DaoErrorKind, ErrorTag, HttpMessage, ProfileChanges, UniqueKey, User, UserId,
    ValidateExt,
};
use koinonia_repository::{PostDao, UserDao};
use std::sync::Arc;
use tracing::{debug, info};

const USER_NOT_FOUND: &str = "User not found";

/// User service backed by the user and post DAOs.
pub struct UserServiceImpl {
    user_dao: Arc<dyn UserDao>,
    post_dao: Arc<dyn PostDao>,
}

impl UserServiceImpl {
    pub fn new(user_dao: Arc<dyn UserDao>, post_dao: Arc<dyn PostDao>) -> Self {
        Self { user_dao, post_dao }
    }

    async fn with_post_count(&self, user: User, tag: ErrorTag) -> HttpMessage<UserProfile> {
        match self.post_dao.count_by_author(user.id).await {
            Ok(post_count) => HttpMessage::ok(UserProfile { user, post_count }),
            Err(e) => fallback(&e, tag),
        }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn get_profile(&self, user_id: UserId) -> HttpMessage<UserProfile> {
        debug!("Getting profile {}", user_id);

        match self.user_dao.find_by_id(user_id).await {
            Ok(Some(user)) => self.with_post_count(user, ErrorTag::GetProfileError).await,
            Ok(None) => HttpMessage::not_found(USER_NOT_FOUND, ErrorTag::UserNotFound),
            Err(e) => fallback(&e, ErrorTag::GetProfileError),
        }
    }

    async fn list_users(&self, request: UserSearchRequest) -> HttpMessage<UserPage> {
        let page = match request.page().to_page_request() {
            Ok(page) => page,
            Err(message) => return HttpMessage::validation(message),
        };
        if let Some(message) = request.validation_failure() {
            return HttpMessage::validation(message);
        }
        let term = non_blank(request.search.as_deref()).map(|term| term.trim().to_owned());

        debug!("Listing users: limit={}, offset={}", page.limit, page.offset);

        match self.user_dao.search(term, page).await {
            Ok(users) => HttpMessage::ok(UserPage::new(users, page)),
            Err(e) => fallback(&e, ErrorTag::GetUsersError),
        }
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        request: UpdateProfileRequest,
    ) -> HttpMessage<UserProfile> {
        if let Some(message) = request.validation_failure() {
            return HttpMessage::validation(message);
        }
        if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return HttpMessage::validation("Name cannot be empty");
        }
        let changes = ProfileChanges::from(request);
        if changes.is_empty() {
            return HttpMessage::validation("At least one field must be provided");
        }

        debug!("Updating profile {}", user_id);

        match self.user_dao.update_profile(user_id, changes).await {
            Ok(user) => {
                info!("Profile {} updated", user_id);
                self.with_post_count(user, ErrorTag::UpdateProfileError).await
            }
            Err(e) if e.is(DaoErrorKind::NotFound) => {
                HttpMessage::not_found(USER_NOT_FOUND, ErrorTag::UserNotFound)
            }
            Err(e) if e.is_duplicate(UniqueKey::Username) => {
                HttpMessage::unprocessable(e.message, ErrorTag::UsernameTaken)
            }
            Err(e) => fallback(&e, ErrorTag::UpdateProfileError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use koinonia_core::{Email, NewPost, NewUser};
    use koinonia_repository::{MemoryStore, MockPostDao, MockUserDao};

    async fn seeded() -> (Arc<MemoryStore>, UserServiceImpl, UserId) {
        let store = Arc::new(MemoryStore::new());
        let user = UserDao::create(
            store.as_ref(),
            NewUser {
                email: Email::new_unchecked("barnabas@example.com"),
                password_hash: "hash".to_string(),
                name: "Barnabas".to_string(),
                first_name: None,
                last_name: None,
                username: Some("barnabas".to_string()),
            },
        )
        .await
        .unwrap();
        let service = UserServiceImpl::new(store.clone(), store.clone());
        (store, service, user.id)
    }

    #[tokio::test]
    async fn test_profile_counts_posts() {
        let (store, service, user_id) = seeded().await;
        PostDao::create(
            store.as_ref(),
            NewPost {
                author_id: user_id,
                community_id: None,
                content: "Son of encouragement".to_string(),
                image_url: None,
                video_url: None,
                verse_reference: None,
                verse_text: None,
                is_public: true,
            },
        )
        .await
        .unwrap();

        let response = service.get_profile(user_id).await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.content().unwrap().post_count, 1);

        let missing = service.get_profile(UserId::new()).await;
        assert_eq!(missing.status_code(), 404);
        assert_eq!(missing.error(), Some(ErrorTag::UserNotFound));
    }

    #[tokio::test]
    async fn test_update_profile() {
        let (_, service, user_id) = seeded().await;

        let response = service
            .update_profile(
                user_id,
                UpdateProfileRequest {
                    bio: Some("Sold a field".to_string()),
                    denomination: Some("Antioch".to_string()),
                    ..UpdateProfileRequest::default()
                },
            )
            .await;

        assert_eq!(response.status_code(), 200);
        let profile = response.content().unwrap();
        assert_eq!(profile.user.bio.as_deref(), Some("Sold a field"));
        assert_eq!(profile.user.name, "Barnabas");
    }

    #[tokio::test]
    async fn test_update_profile_validation_makes_no_dao_call() {
        let mut user_dao = MockUserDao::new();
        user_dao.expect_update_profile().times(0);
        let service = UserServiceImpl::new(Arc::new(user_dao), Arc::new(MockPostDao::new()));

        let empty = service
            .update_profile(UserId::new(), UpdateProfileRequest::default())
            .await;
        assert_eq!(empty.status_code(), 422);
        assert_eq!(empty.message(), Some("At least one field must be provided"));

        let bad_url = service
            .update_profile(
                UserId::new(),
                UpdateProfileRequest {
                    profile_image_url: Some("not-a-url".to_string()),
                    ..UpdateProfileRequest::default()
                },
            )
            .await;
        assert_eq!(bad_url.error(), Some(ErrorTag::ValidationError));
    }

    #[tokio::test]
    async fn test_update_profile_of_missing_user() {
        let (_, service, _) = seeded().await;
        let response = service
            .update_profile(
                UserId::new(),
                UpdateProfileRequest {
                    bio: Some("Ghost".to_string()),
                    ..UpdateProfileRequest::default()
                },
            )
            .await;
        assert_eq!(response.status_code(), 404);
    }

    #[tokio::test]
    async fn test_update_profile_to_taken_username() {
        let (store, service, _) = seeded().await;
        let other = UserDao::create(
            store.as_ref(),
            NewUser {
                email: Email::new_unchecked("mary@example.com"),
                password_hash: "hash".to_string(),
                name: "Mary".to_string(),
                first_name: None,
                last_name: None,
                username: None,
            },
        )
        .await
        .unwrap();

        let response = service
            .update_profile(
                other.id,
                UpdateProfileRequest {
                    username: Some("Barnabas".to_string()),
                    ..UpdateProfileRequest::default()
                },
            )
            .await;
        assert_eq!(response.status_code(), 422);
        assert_eq!(response.error(), Some(ErrorTag::UsernameTaken));
        assert_eq!(response.message(), Some("Username already taken"));
    }

    #[tokio::test]
    async fn test_list_users_searches_names() {
        let (store, service, user_id) = seeded().await;
        UserDao::create(
            store.as_ref(),
            NewUser {
                email: Email::new_unchecked("john.mark@example.com"),
                password_hash: "hash".to_string(),
                name: "John Mark".to_string(),
                first_name: Some("John".to_string()),
                last_name: None,
                username: None,
            },
        )
        .await
        .unwrap();

        let all = service.list_users(UserSearchRequest::default()).await;
        assert_eq!(all.status_code(), 200);
        let page = all.content().unwrap();
        assert_eq!(page.users.len(), 2);
        assert!(!page.pagination.has_more);

        let found = service
            .list_users(UserSearchRequest {
                search: Some(" barn ".to_string()),
                ..UserSearchRequest::default()
            })
            .await;
        let users = &found.content().unwrap().users;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, user_id);
    }

    #[tokio::test]
    async fn test_list_users_bounds_make_no_dao_call() {
        let mut user_dao = MockUserDao::new();
        user_dao.expect_search().times(0);
        let service = UserServiceImpl::new(Arc::new(user_dao), Arc::new(MockPostDao::new()));

        let response = service
            .list_users(UserSearchRequest {
                limit: Some(101),
                ..UserSearchRequest::default()
            })
            .await;
        assert_eq!(response.status_code(), 422);
        assert_eq!(response.error(), Some(ErrorTag::ValidationError));
    }

    #[tokio::test]
    async fn test_list_users_unavailable_store() {
        let mut user_dao = MockUserDao::new();
        user_dao
            .expect_search()
            .returning(|_, _| Err(koinonia_core::DaoError::unavailable("Database unavailable")));
        let service = UserServiceImpl::new(Arc::new(user_dao), Arc::new(MockPostDao::new()));

        let response = service.list_users(UserSearchRequest::default()).await;
        assert_eq!(response.status_code(), 500);
        assert_eq!(response.error(), Some(ErrorTag::ServerError));
    }
}
