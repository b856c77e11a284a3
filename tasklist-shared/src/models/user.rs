/// User model
///
/// A user is a single document: identity fields plus the embedded, ordered
/// list of task groups. The document `version` increments on every write to
/// the task hierarchy (see `store::UserStore::update_task_groups`).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     username TEXT NOT NULL UNIQUE,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT FALSE,
///     task_groups JSONB NOT NULL DEFAULT '[]'::jsonb,
///     version BIGINT NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task_group::TaskGroup;

/// Registration state gating login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Registered, email not yet confirmed
    Pending,

    /// Email confirmed
    Active,
}

/// User account with its embedded task hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Set once the email address is confirmed
    pub is_active: bool,

    /// Task groups, ordered by `order_num`
    pub task_groups: Vec<TaskGroup>,

    /// Document version for conditional task hierarchy writes
    pub version: i64,

    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a freshly registered, inactive user with no task groups
    pub fn register(data: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            is_active: false,
            task_groups: Vec::new(),
            version: 0,
            created_at: Utc::now(),
        }
    }

    /// Current registration state
    pub fn status(&self) -> AccountStatus {
        if self.is_active {
            AccountStatus::Active
        } else {
            AccountStatus::Pending
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,

    /// Argon2id hash, never the plaintext password
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[test]
    fn test_register_starts_pending() {
        let user = User::register(new_user());

        assert_eq!(user.username, "alice");
        assert_eq!(user.status(), AccountStatus::Pending);
        assert!(user.task_groups.is_empty());
        assert_eq!(user.version, 0);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::register(new_user());
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
