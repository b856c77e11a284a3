/// PostgreSQL user store
///
/// One row per user; the task hierarchy is the `task_groups` JSONB column.
/// Hierarchy edits run in one transaction holding the user's row lock:
///
/// ```sql
/// SELECT task_groups FROM users WHERE id = $1 FOR UPDATE;
/// -- edit in process
/// UPDATE users SET task_groups = $2, version = version + 1 WHERE id = $1;
/// ```
///
/// so concurrent edits to one user queue on the row instead of clobbering
/// each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use tracing::debug;
use uuid::Uuid;

use super::{GroupsEdit, StoreError, StoreResult, UserStore};
use crate::db::pool;
use crate::models::{NewUser, TaskGroup, User};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, is_active, task_groups, version, created_at";

/// Row shape of the `users` table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    is_active: bool,
    task_groups: Json<Vec<TaskGroup>>,
    version: i64,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            is_active: row.is_active,
            task_groups: row.task_groups.0,
            version: row.version,
            created_at: row.created_at,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("User not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.constraint() {
                Some(c) if c.contains("username") => {
                    StoreError::Conflict("Username already registered".to_string())
                }
                Some(c) if c.contains("email") => {
                    StoreError::Conflict("Email already registered".to_string())
                }
                Some(c) => StoreError::Conflict(format!("Constraint violation: {}", c)),
                None => StoreError::Backend(format!("Database error: {}", db_err)),
            },
            sqlx::Error::ColumnDecode { source, .. } => StoreError::Serialization(source.to_string()),
            _ => StoreError::Backend(format!("Database error: {}", err)),
        }
    }
}

/// `UserStore` backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn find_one(&self, column: &str, value: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> StoreResult<()> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.find_one("email", email).await
    }

    async fn create(&self, data: NewUser) -> StoreResult<User> {
        let user = User::register(data);

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_active, task_groups, version, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(Json(user.task_groups.clone()))
        .bind(user.version)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        debug!(user_id = %user.id, "Inserted user row");
        Ok(user)
    }

    async fn activate(&self, email: &str) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE users SET is_active = TRUE WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_password_hash(&self, email: &str, password_hash: &str) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE email = $1")
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_task_groups<'a>(&self, id: Uuid, edit: GroupsEdit<'a>) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Json<Vec<TaskGroup>>,)> =
            sqlx::query_as("SELECT task_groups FROM users WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((Json(mut groups),)) = row else {
            return Ok(false);
        };

        if !edit(&mut groups) {
            tx.rollback().await?;
            return Ok(true);
        }

        sqlx::query("UPDATE users SET task_groups = $2, version = version + 1 WHERE id = $1")
            .bind(id)
            .bind(Json(groups))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(user_id = %id, "Task groups written");
        Ok(true)
    }
}
