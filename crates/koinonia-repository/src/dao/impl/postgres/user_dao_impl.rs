//! PostgreSQL implementation of [`UserDao`].

use super::contains_pattern;
use super::rows::UserRow;
use crate::dao::error::{store_error, violated_constraint};
use crate::{DatabasePool, UserDao};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use koinonia_core::{
    DaoError, DaoErrorKind, DaoResult, Email, NewUser, PageRequest, ProfileChanges, UniqueKey, User,
    UserId,
};
use sqlx::postgres::PgQueryResult;
use std::sync::Arc;
use tracing::{debug, info};

/// PostgreSQL user DAO.
#[derive(Clone)]
pub struct PgUserDaoImpl {
    pool: Arc<DatabasePool>,
}

impl PgUserDaoImpl {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Maps a unique index on `users` to the field it guards.
fn unique_key(constraint: &str) -> Option<UniqueKey> {
    match constraint {
        "idx_users_email" => Some(UniqueKey::Email),
        "idx_users_username" => Some(UniqueKey::Username),
        _ => None,
    }
}

/// Classifies a failed write to `users`, naming the field behind a clash.
fn write_error(operation: &'static str, err: sqlx::Error) -> DaoError {
    let key = violated_constraint(&err).as_deref().and_then(unique_key);
    let err = store_error(operation, err);
    if !err.is(DaoErrorKind::AlreadyExists) {
        return err;
    }
    match key {
        Some(UniqueKey::Email) => DaoError::duplicate(UniqueKey::Email, "Email already registered"),
        Some(UniqueKey::Username) => {
            DaoError::duplicate(UniqueKey::Username, "Username already taken")
        }
        None => err,
    }
}

fn require_row(result: PgQueryResult) -> DaoResult<()> {
    if result.rows_affected() == 0 {
        Err(DaoError::not_found("User not found"))
    } else {
        Ok(())
    }
}

#[async_trait]
impl UserDao for PgUserDaoImpl {
    async fn create(&self, user: NewUser) -> DaoResult<User> {
        debug!("Creating user {}", user.email);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, password_hash, name, first_name, last_name, username)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, email, password_hash, name, first_name, last_name, username,
                      profile_image_url, denomination, bio, favorite_verse, is_verified,
                      failed_login_attempts, locked_until, refresh_token_hash,
                      refresh_token_expires_at, last_login_at, created_at, updated_at
            "#,
        )
        .bind(UserId::new().into_inner())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| write_error("create the account", e))?;

        let user = User::from(row);
        info!("User {} created", user.id);
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> DaoResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, name, first_name, last_name, username,
                   profile_image_url, denomination, bio, favorite_verse, is_verified,
                   failed_login_attempts, locked_until, refresh_token_hash,
                   refresh_token_expires_at, last_login_at, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await
        .map_err(|e| store_error("fetch the user", e))?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &Email) -> DaoResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, name, first_name, last_name, username,
                   profile_image_url, denomination, bio, favorite_verse, is_verified,
                   failed_login_attempts, locked_until, refresh_token_hash,
                   refresh_token_expires_at, last_login_at, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(self.pool.inner())
        .await
        .map_err(|e| store_error("fetch the user", e))?;

        Ok(row.map(User::from))
    }

    async fn search(&self, term: Option<String>, page: PageRequest) -> DaoResult<Vec<User>> {
        debug!(
            "Searching users, limit: {}, offset: {}",
            page.limit, page.offset
        );

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, name, first_name, last_name, username,
                   profile_image_url, denomination, bio, favorite_verse, is_verified,
                   failed_login_attempts, locked_until, refresh_token_hash,
                   refresh_token_expires_at, last_login_at, created_at, updated_at
            FROM users
            WHERE $1::text IS NULL
               OR name ILIKE $1
               OR first_name ILIKE $1
               OR last_name ILIKE $1
               OR username ILIKE $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(term.as_deref().map(contains_pattern))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(self.pool.inner())
        .await
        .map_err(|e| store_error("fetch users", e))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update_profile(&self, id: UserId, changes: ProfileChanges) -> DaoResult<User> {
        debug!("Updating profile of user {}", id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                username = COALESCE($5, username),
                profile_image_url = COALESCE($6, profile_image_url),
                denomination = COALESCE($7, denomination),
                bio = COALESCE($8, bio),
                favorite_verse = COALESCE($9, favorite_verse),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, name, first_name, last_name, username,
                      profile_image_url, denomination, bio, favorite_verse, is_verified,
                      failed_login_attempts, locked_until, refresh_token_hash,
                      refresh_token_expires_at, last_login_at, created_at, updated_at
            "#,
        )
        .bind(id.into_inner())
        .bind(&changes.name)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.username)
        .bind(&changes.profile_image_url)
        .bind(&changes.denomination)
        .bind(&changes.bio)
        .bind(&changes.favorite_verse)
        .fetch_optional(self.pool.inner())
        .await
        .map_err(|e| write_error("update the profile", e))?;

        row.map(User::from)
            .ok_or_else(|| DaoError::not_found("User not found"))
    }

    async fn record_login_failure(
        &self,
        id: UserId,
        attempts: i32,
        locked_until: Option<DateTime<Utc>>,
    ) -> DaoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET failed_login_attempts = $2, locked_until = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(attempts)
        .bind(locked_until)
        .execute(self.pool.inner())
        .await
        .map_err(|e| store_error("record the failed login", e))?;

        require_row(result)
    }

    async fn record_login_success(
        &self,
        id: UserId,
        refresh_token_hash: String,
        refresh_expires_at: DateTime<Utc>,
    ) -> DaoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET failed_login_attempts = 0,
                locked_until = NULL,
                last_login_at = NOW(),
                refresh_token_hash = $2,
                refresh_token_expires_at = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(&refresh_token_hash)
        .bind(refresh_expires_at)
        .execute(self.pool.inner())
        .await
        .map_err(|e| store_error("record the login", e))?;

        require_row(result)
    }

    async fn clear_refresh_token(&self, id: UserId) -> DaoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = NULL, refresh_token_expires_at = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(self.pool.inner())
        .await
        .map_err(|e| store_error("sign out", e))?;

        require_row(result)
    }
}
