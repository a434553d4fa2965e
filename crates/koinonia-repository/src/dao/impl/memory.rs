//! In-process store implementing every DAO.
//!
//! All tables sit behind one `parking_lot::RwLock`, so each DAO call is a
//! single atomic step, and the same constraints the schema declares
//! (unique likes, unique emails, foreign keys with cascading deletes) are
//! checked under that lock.

use super::assemble_threads;
use crate::{CommentDao, InteractionDao, LikeDao, PostDao, UserDao};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use koinonia_core::{
    Comment, CommentId, CommentThread, CommentWithAuthor, DaoError, DaoResult, Email, FeedPost,
    FeedQuery, Interaction, InteractionId, InteractionType, Like, LikeId, NewComment,
    NewInteraction, NewPost, NewUser, PageRequest, Post, PostChanges, PostId, PostStats,
    ProfileChanges, UniqueKey, User, UserId, ALREADY_LIKED,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};

const UNAVAILABLE: &str = "Database unavailable";

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    posts: HashMap<PostId, Post>,
    comments: HashMap<CommentId, Comment>,
    likes: HashMap<(UserId, PostId), Like>,
    interactions: Vec<Interaction>,
}

impl Tables {
    fn email_taken(&self, email: &Email) -> bool {
        self.users.values().any(|u| u.email == *email)
    }

    fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users.values().any(|u| {
            Some(u.id) != except
                && u.username
                    .as_deref()
                    .is_some_and(|taken| taken.eq_ignore_ascii_case(username))
        })
    }

    fn stats(&self, post_id: PostId) -> PostStats {
        let count = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        PostStats {
            likes: count(self.likes.keys().filter(|(_, p)| *p == post_id).count()),
            comments: count(
                self.comments
                    .values()
                    .filter(|c| c.post_id == post_id && !c.is_deleted())
                    .count(),
            ),
            shares: count(
                self.interactions
                    .iter()
                    .filter(|i| {
                        i.post_id == Some(post_id) && i.interaction_type == InteractionType::Share
                    })
                    .count(),
            ),
        }
    }

    fn with_author(&self, comment: &Comment) -> Option<CommentWithAuthor> {
        let author = self.users.get(&comment.author_id)?.author_summary();
        Some(CommentWithAuthor {
            comment: comment.clone(),
            author,
        })
    }

    /// Removes a post and every row that references it.
    fn cascade_delete_post(&mut self, post_id: PostId) {
        self.posts.remove(&post_id);
        let removed: Vec<CommentId> = self
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .map(|c| c.id)
            .collect();
        self.comments.retain(|_, c| c.post_id != post_id);
        self.likes.retain(|(_, p), _| *p != post_id);
        self.interactions.retain(|i| {
            i.post_id != Some(post_id) && !i.comment_id.is_some_and(|c| removed.contains(&c))
        });
    }
}

/// In-memory implementation of every DAO trait.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    available: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates the store going away; every call then fails as `Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn check_available(&self, operation: &'static str) -> DaoResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            error!(operation, "Store operation failed: store unavailable");
            Err(DaoError::unavailable(UNAVAILABLE))
        }
    }

    /// Removes a post directly, bypassing ownership. Used to stage races in tests.
    pub fn purge_post(&self, post_id: PostId) {
        self.tables.write().cascade_delete_post(post_id);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("MemoryStore")
            .field("users", &tables.users.len())
            .field("posts", &tables.posts.len())
            .field("comments", &tables.comments.len())
            .field("likes", &tables.likes.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PostDao for MemoryStore {
    async fn create(&self, post: NewPost) -> DaoResult<Post> {
        self.check_available("create a post")?;
        let mut tables = self.tables.write();

        if !tables.users.contains_key(&post.author_id) {
            return Err(DaoError::not_found("Author not found"));
        }

        let post = post.into_post(PostId::new(), Utc::now());
        tables.posts.insert(post.id, post.clone());
        info!("Post {} created", post.id);
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> DaoResult<Option<Post>> {
        self.check_available("fetch the post")?;
        Ok(self.tables.read().posts.get(&id).cloned())
    }

    async fn find_feed(&self, query: FeedQuery) -> DaoResult<Vec<FeedPost>> {
        self.check_available("fetch posts")?;
        let tables = self.tables.read();

        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| p.is_visible_to(query.viewer) && query.matches(p))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let feed = query
            .page
            .apply(posts.into_iter())
            .filter_map(|post| {
                let author = tables.users.get(&post.author_id)?.author_summary();
                let is_liked = query
                    .viewer
                    .is_some_and(|viewer| tables.likes.contains_key(&(viewer, post.id)));
                Some(FeedPost {
                    post: post.clone(),
                    author,
                    stats: tables.stats(post.id),
                    is_liked,
                })
            })
            .collect();
        Ok(feed)
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> DaoResult<Post> {
        self.check_available("update the post")?;
        let mut tables = self.tables.write();

        let post = tables
            .posts
            .get_mut(&id)
            .ok_or_else(|| DaoError::not_found("Post not found"))?;
        changes.apply(post);
        info!("Post {} updated", id);
        Ok(post.clone())
    }

    async fn delete_owned(&self, id: PostId, owner: UserId) -> DaoResult<()> {
        self.check_available("delete the post")?;
        let mut tables = self.tables.write();

        match tables.posts.get(&id) {
            None => Err(DaoError::not_found("Post not found")),
            Some(post) if !post.is_owned_by(owner) => {
                Err(DaoError::forbidden("You can only delete your own posts"))
            }
            Some(_) => {
                tables.cascade_delete_post(id);
                info!("Post {} deleted", id);
                Ok(())
            }
        }
    }

    async fn count_by_author(&self, author: UserId) -> DaoResult<i64> {
        self.check_available("count posts")?;
        let count = self
            .tables
            .read()
            .posts
            .values()
            .filter(|p| p.author_id == author)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl CommentDao for MemoryStore {
    async fn create(&self, comment: NewComment) -> DaoResult<Comment> {
        self.check_available("create a comment")?;
        let mut tables = self.tables.write();

        if !tables.posts.contains_key(&comment.post_id) {
            return Err(DaoError::not_found("Post not found"));
        }
        if !tables.users.contains_key(&comment.author_id) {
            return Err(DaoError::not_found("Author not found"));
        }
        if let Some(parent_id) = comment.parent_id {
            if !tables.comments.contains_key(&parent_id) {
                return Err(DaoError::not_found("Parent comment not found"));
            }
        }

        let comment = comment.into_comment(CommentId::new(), Utc::now());
        tables.comments.insert(comment.id, comment.clone());
        info!("Comment {} created", comment.id);
        Ok(comment)
    }

    async fn find_by_id(&self, id: CommentId) -> DaoResult<Option<Comment>> {
        self.check_available("fetch the comment")?;
        Ok(self
            .tables
            .read()
            .comments
            .get(&id)
            .filter(|c| !c.is_deleted())
            .cloned())
    }

    async fn find_by_post(&self, post_id: PostId, page: PageRequest) -> DaoResult<Vec<CommentThread>> {
        self.check_available("fetch comments")?;
        let tables = self.tables.read();

        let mut live: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id && !c.is_deleted())
            .collect();
        live.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let top: Vec<CommentId> = page
            .apply(live.iter().filter(|c| c.parent_id.is_none()))
            .map(|c| c.id)
            .collect();

        let selected = live
            .into_iter()
            .filter(|c| top.contains(&c.id) || c.parent_id.is_some_and(|p| top.contains(&p)))
            .filter_map(|c| tables.with_author(c));

        Ok(assemble_threads(selected))
    }

    async fn update(&self, id: CommentId, content: String) -> DaoResult<Comment> {
        self.check_available("update the comment")?;
        let mut tables = self.tables.write();

        let comment = tables
            .comments
            .get_mut(&id)
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| DaoError::not_found("Comment not found"))?;
        comment.content = content;
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn soft_delete(&self, id: CommentId) -> DaoResult<()> {
        self.check_available("delete the comment")?;
        let mut tables = self.tables.write();

        let comment = tables
            .comments
            .get_mut(&id)
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| DaoError::not_found("Comment not found"))?;
        let now = Utc::now();
        comment.deleted_at = Some(now);
        comment.updated_at = now;
        info!("Comment {} deleted", id);
        Ok(())
    }
}

#[async_trait]
impl LikeDao for MemoryStore {
    async fn create(&self, user_id: UserId, post_id: PostId) -> DaoResult<Like> {
        self.check_available("like the post")?;
        let mut tables = self.tables.write();

        if !tables.posts.contains_key(&post_id) {
            error!(%post_id, "Store operation failed: like references missing post");
            return Err(DaoError::not_found("Post not found"));
        }
        if !tables.users.contains_key(&user_id) {
            error!(%user_id, "Store operation failed: like references missing user");
            return Err(DaoError::store("Failed to like the post."));
        }
        if tables.likes.contains_key(&(user_id, post_id)) {
            error!(%user_id, %post_id, "Store operation failed: duplicate like");
            return Err(DaoError::already_exists(ALREADY_LIKED));
        }

        let like = Like {
            id: LikeId::new(),
            user_id,
            post_id,
            created_at: Utc::now(),
        };
        tables.likes.insert((user_id, post_id), like.clone());
        info!("User {} liked post {}", user_id, post_id);
        Ok(like)
    }

    async fn delete(&self, user_id: UserId, post_id: PostId) -> DaoResult<()> {
        self.check_available("unlike the post")?;
        if self.tables.write().likes.remove(&(user_id, post_id)).is_none() {
            return Err(DaoError::not_found("Like not found"));
        }
        info!("User {} unliked post {}", user_id, post_id);
        Ok(())
    }

    async fn exists(&self, user_id: UserId, post_id: PostId) -> DaoResult<bool> {
        self.check_available("check the like")?;
        Ok(self.tables.read().likes.contains_key(&(user_id, post_id)))
    }
}

#[async_trait]
impl InteractionDao for MemoryStore {
    async fn create(&self, interaction: NewInteraction) -> DaoResult<Interaction> {
        self.check_available("record the interaction")?;
        let mut tables = self.tables.write();

        let post_missing = interaction
            .post_id
            .is_some_and(|id| !tables.posts.contains_key(&id));
        let comment_missing = interaction
            .comment_id
            .is_some_and(|id| !tables.comments.contains_key(&id));
        if post_missing || comment_missing || !tables.users.contains_key(&interaction.user_id) {
            return Err(DaoError::not_found("Interaction target not found"));
        }

        let interaction = interaction.into_interaction(InteractionId::new(), Utc::now());
        debug!(
            "Recorded {} interaction {}",
            interaction.interaction_type, interaction.id
        );
        tables.interactions.push(interaction.clone());
        Ok(interaction)
    }
}

#[async_trait]
impl UserDao for MemoryStore {
    async fn create(&self, user: NewUser) -> DaoResult<User> {
        self.check_available("create the account")?;
        let mut tables = self.tables.write();

        if tables.email_taken(&user.email) {
            return Err(DaoError::duplicate(UniqueKey::Email, "Email already registered"));
        }
        if let Some(username) = &user.username {
            if tables.username_taken(username, None) {
                return Err(DaoError::duplicate(UniqueKey::Username, "Username already taken"));
            }
        }

        let mut created = User::new(user.email, user.password_hash, user.name);
        created.first_name = user.first_name;
        created.last_name = user.last_name;
        created.username = user.username;
        tables.users.insert(created.id, created.clone());
        info!("User {} created", created.id);
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> DaoResult<Option<User>> {
        self.check_available("fetch the user")?;
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> DaoResult<Option<User>> {
        self.check_available("fetch the user")?;
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn search(&self, term: Option<String>, page: PageRequest) -> DaoResult<Vec<User>> {
        self.check_available("fetch users")?;
        let term = term.map(|t| t.to_lowercase());
        let contains = |field: Option<&str>, term: &str| {
            field.is_some_and(|value| value.to_lowercase().contains(term))
        };

        let tables = self.tables.read();
        let mut users: Vec<&User> = tables
            .users
            .values()
            .filter(|u| {
                term.as_deref().map_or(true, |term| {
                    contains(Some(u.name.as_str()), term)
                        || contains(u.first_name.as_deref(), term)
                        || contains(u.last_name.as_deref(), term)
                        || contains(u.username.as_deref(), term)
                })
            })
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page.apply(users.into_iter()).cloned().collect())
    }

    async fn update_profile(&self, id: UserId, changes: ProfileChanges) -> DaoResult<User> {
        self.check_available("update the profile")?;
        let mut tables = self.tables.write();

        if let Some(username) = &changes.username {
            if tables.username_taken(username, Some(id)) {
                return Err(DaoError::duplicate(UniqueKey::Username, "Username already taken"));
            }
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DaoError::not_found("User not found"))?;
        changes.apply(user);
        Ok(user.clone())
    }

    async fn record_login_failure(
        &self,
        id: UserId,
        attempts: i32,
        locked_until: Option<DateTime<Utc>>,
    ) -> DaoResult<()> {
        self.check_available("record the failed login")?;
        let mut tables = self.tables.write();

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DaoError::not_found("User not found"))?;
        user.failed_login_attempts = attempts;
        user.locked_until = locked_until;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn record_login_success(
        &self,
        id: UserId,
        refresh_token_hash: String,
        refresh_expires_at: DateTime<Utc>,
    ) -> DaoResult<()> {
        self.check_available("record the login")?;
        let mut tables = self.tables.write();

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DaoError::not_found("User not found"))?;
        let now = Utc::now();
        user.failed_login_attempts = 0;
        user.locked_until = None;
        user.last_login_at = Some(now);
        user.refresh_token_hash = Some(refresh_token_hash);
        user.refresh_token_expires_at = Some(refresh_expires_at);
        user.updated_at = now;
        Ok(())
    }

    async fn clear_refresh_token(&self, id: UserId) -> DaoResult<()> {
        self.check_available("sign out")?;
        let mut tables = self.tables.write();

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DaoError::not_found("User not found"))?;
        user.refresh_token_hash = None;
        user.refresh_token_expires_at = None;
        user.updated_at = Utc::now();
        Ok(())
    }
}
