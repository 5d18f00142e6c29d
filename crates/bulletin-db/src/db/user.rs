//! User repository

use bulletin_core::models::{User, UserRole};
use bulletin_core::AppError;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub role: String,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, AppError> {
        Ok(User {
            id: Uuid::parse_str(&self.id)
                .map_err(|e| AppError::Internal(format!("Corrupt user id: {}", e)))?,
            username: self.username,
            email: self.email,
            hashed_password: self.hashed_password,
            role: UserRole::parse(&self.role),
            is_blocked: self.is_blocked,
            created_at: self.created_at,
        })
    }
}

/// Repository for user accounts
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user and return the stored record
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, username, email, hashed_password, role, is_blocked, created_at)
             VALUES (?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(id.to_string())
        .bind(username)
        .bind(email)
        .bind(hashed_password)
        .bind(role.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            role,
            is_blocked: false,
            created_at,
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as::<Sqlite, UserRow>("SELECT * FROM users WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(UserRow::into_user).transpose()
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as::<Sqlite, UserRow>("SELECT * FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        row.map(UserRow::into_user).transpose()
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> =
            sqlx::query_as::<Sqlite, UserRow>("SELECT * FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(UserRow::into_user).transpose()
    }

    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let rows: Vec<UserRow> = sqlx::query_as::<Sqlite, UserRow>(
            "SELECT * FROM users ORDER BY created_at LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    /// Update the blocked flag; returns the updated user, or None if missing
    pub async fn set_blocked(&self, id: Uuid, is_blocked: bool) -> Result<Option<User>, AppError> {
        let result = sqlx::query("UPDATE users SET is_blocked = ? WHERE id = ?")
            .bind(is_blocked)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        tracing::debug!(user_id = %id, is_blocked, "Updated user blocked flag");
        self.get_by_id(id).await
    }
}
