/// Schema bootstrap
///
/// The store needs a single `users` table. It is created at startup if
/// missing; the inline `UNIQUE` constraints get PostgreSQL's default names
/// (`users_username_key`, `users_email_key`), which the store uses to tell
/// username conflicts from email conflicts.

use sqlx::postgres::PgPool;
use tracing::info;

/// DDL for the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT FALSE,
    task_groups JSONB NOT NULL DEFAULT '[]'::jsonb,
    version BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Creates the users table if it does not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_USERS_TABLE).execute(pool).await?;
    info!("Database schema ready");
    Ok(())
}
