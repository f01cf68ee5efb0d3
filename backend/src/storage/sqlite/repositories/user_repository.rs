use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::models::user::User;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::UserStore;
use crate::storage::StorageError;

/// Repository for user and login-session operations
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_user(row: &SqliteRow) -> Result<User> {
        let created_at: String = row.get("created_at");
        Ok(User {
            id: row.get("id"),
            username: row.get("username"),
            password: row.get("password"),
            created_at: DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn store_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.created_at.to_rfc3339())
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_user(&r)?)),
            None => Ok(None),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_user(&r)?)),
            None => Ok(None),
        }
    }

    async fn get_active_user(&self) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT user_id
            FROM active_user
            WHERE id = 1
            "#,
        )
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(r.get("user_id"))),
            None => Ok(None),
        }
    }

    async fn set_active_user(&self, user_id: &str) -> Result<()> {
        // First verify the user exists
        let user_exists = sqlx::query(
            r#"
            SELECT 1 FROM users WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?
        .is_some();

        if !user_exists {
            return Err(StorageError::not_found("user", user_id).into());
        }

        // Use INSERT OR REPLACE to handle both initial insert and updates
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO active_user (id, user_id, updated_at)
            VALUES (1, ?, CURRENT_TIMESTAMP)
            "#,
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn clear_active_user(&self) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM active_user WHERE id = 1
            "#,
        )
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
