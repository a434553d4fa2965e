//! Dependency wiring.
//!
//! Picks the backing store, then builds every service over it and hands
//! the result to the REST layer as an [`AppState`].

use koinonia_config::{AppConfig, SecurityConfig, StoreKind};
use koinonia_core::KoinoniaResult;
use koinonia_repository::{
    create_pool, CommentDao, DatabasePool, InteractionDao, LikeDao, MemoryStore, PgCommentDaoImpl,
    PgInteractionDaoImpl, PgLikeDaoImpl, PgPostDaoImpl, PgUserDaoImpl, PostDao, StoreHealth,
    UserDao,
};
use koinonia_rest::AppState;
use koinonia_security::PasswordHasher;
use koinonia_service::{
    AuthServiceImpl, CommentServiceImpl, InteractionServiceImpl, PostServiceImpl, UserServiceImpl,
};
use std::sync::Arc;
use tracing::{info, warn};

/// The data access objects every service is built on.
#[derive(Clone)]
pub struct DaoModule {
    pub users: Arc<dyn UserDao>,
    pub posts: Arc<dyn PostDao>,
    pub comments: Arc<dyn CommentDao>,
    pub likes: Arc<dyn LikeDao>,
    pub interactions: Arc<dyn InteractionDao>,
    pub health: Arc<dyn StoreHealth>,
    pool: Option<Arc<DatabasePool>>,
}

impl DaoModule {
    /// PostgreSQL-backed DAOs sharing one pool.
    #[must_use]
    pub fn postgres(pool: Arc<DatabasePool>) -> Self {
        Self {
            users: Arc::new(PgUserDaoImpl::new(pool.clone())),
            posts: Arc::new(PgPostDaoImpl::new(pool.clone())),
            comments: Arc::new(PgCommentDaoImpl::new(pool.clone())),
            likes: Arc::new(PgLikeDaoImpl::new(pool.clone())),
            interactions: Arc::new(PgInteractionDaoImpl::new(pool.clone())),
            health: pool.clone(),
            pool: Some(pool),
        }
    }

    /// Every DAO served by one in-process store.
    #[must_use]
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            likes: store.clone(),
            interactions: store.clone(),
            health: store,
            pool: None,
        }
    }

    /// Opens the store named by the configuration.
    pub async fn from_config(config: &AppConfig) -> KoinoniaResult<Self> {
        match config.database.store {
            StoreKind::Postgres => {
                let pool = create_pool(&config.database).await?;
                if config.database.run_migrations {
                    pool.run_migrations().await?;
                }
                info!("Using PostgreSQL store");
                Ok(Self::postgres(pool))
            }
            StoreKind::Memory => {
                warn!("Using in-memory store; data will not survive a restart");
                Ok(Self::memory(Arc::new(MemoryStore::new())))
            }
        }
    }

    /// Releases the store's connections. A no-op for the in-memory store.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

/// Builds the services over `daos` and collects them into the REST state.
#[must_use]
pub fn build_app_state(daos: DaoModule, security: &SecurityConfig) -> AppState {
    let hasher = Arc::new(PasswordHasher::with_cost(security.password_hash_cost));

    AppState {
        post_service: Arc::new(PostServiceImpl::new(
            daos.posts.clone(),
            daos.likes,
            daos.interactions.clone(),
        )),
        comment_service: Arc::new(CommentServiceImpl::new(
            daos.comments,
            daos.posts.clone(),
            daos.interactions.clone(),
        )),
        interaction_service: Arc::new(InteractionServiceImpl::new(daos.interactions)),
        auth_service: Arc::new(AuthServiceImpl::new(
            daos.users.clone(),
            hasher,
            Arc::new(security.clone()),
        )),
        user_service: Arc::new(UserServiceImpl::new(daos.users, daos.posts)),
        store: daos.health,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use koinonia_service::{FeedRequest, RegisterRequest};

    fn memory_state() -> AppState {
        let mut security = SecurityConfig::default();
        security.password_hash_cost = 1;
        build_app_state(DaoModule::memory(Arc::new(MemoryStore::new())), &security)
    }

    #[tokio::test]
    async fn test_memory_module_is_healthy() {
        let state = memory_state();
        assert!(state.store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_services_share_one_store() {
        let state = memory_state();

        let registered = state
            .auth_service
            .register(RegisterRequest {
                email: Some("lydia@example.com".to_string()),
                password: Some("purple-cloth".to_string()),
                name: Some("Lydia".to_string()),
                ..RegisterRequest::default()
            })
            .await;
        assert_eq!(registered.status_code(), 201);
        let user = registered.content().map(|auth| auth.user.id).unwrap();

        let profile = state.user_service.get_profile(user).await;
        assert_eq!(profile.status_code(), 200);

        let feed = state.post_service.get_feed(FeedRequest::default(), Some(user)).await;
        assert_eq!(feed.status_code(), 200);
    }

    #[tokio::test]
    async fn test_memory_store_from_config() {
        let mut config = AppConfig::default();
        config.database.store = StoreKind::Memory;
        let daos = DaoModule::from_config(&config).await.unwrap();
        assert!(daos.health.ping().await.is_ok());

        daos.close().await;
        assert!(daos.health.ping().await.is_ok());
    }
}
