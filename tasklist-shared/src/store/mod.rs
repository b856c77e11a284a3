/// Credential store
///
/// Persists user documents. Each user document (identity fields plus the
/// embedded task hierarchy) is the unit of atomicity: a task hierarchy change
/// reads, edits and rewrites the whole group list while the store holds that
/// one document, so concurrent writers to one user serialize at the store and
/// writers to different users never contend.
///
/// # Implementations
///
/// - [`postgres::PgUserStore`]: PostgreSQL, one row per user, hierarchy in JSONB
/// - [`memory::MemoryUserStore`]: in-process map with the same semantics
///
/// # Example
///
/// ```
/// use tasklist_shared::models::NewUser;
/// use tasklist_shared::store::{memory::MemoryUserStore, UserStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryUserStore::new();
/// let user = store
///     .create(NewUser {
///         username: "alice".to_string(),
///         email: "alice@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     })
///     .await?;
///
/// assert!(store.find_by_username("alice").await?.is_some());
/// let found = store
///     .update_task_groups(user.id, Box::new(|groups: &mut Vec<_>| groups.is_empty()))
///     .await?;
/// assert!(found);
/// assert_eq!(store.find_by_id(user.id).await?.map(|u| u.version), Some(1));
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewUser, TaskGroup, User};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Uniqueness constraint violated
    #[error("{0}")]
    Conflict(String),

    /// Referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Stored document could not be decoded or encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backing store failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Edit run against a user's task groups; returns `true` to write them back
pub type GroupsEdit<'a> = Box<dyn FnOnce(&mut Vec<TaskGroup>) -> bool + Send + 'a>;

/// Persistence contract for user documents
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Short backend name for diagnostics ("postgres", "memory")
    fn backend(&self) -> &'static str;

    /// Verifies the backend is reachable
    async fn health_check(&self) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Inserts an inactive user with an empty task hierarchy
    ///
    /// Fails with `StoreError::Conflict` if the username or email is taken.
    async fn create(&self, data: NewUser) -> StoreResult<User>;

    /// Marks the user with this email active; returns whether one matched
    async fn activate(&self, email: &str) -> StoreResult<bool>;

    /// Replaces the password hash; returns whether a user matched
    async fn update_password_hash(&self, email: &str, password_hash: &str) -> StoreResult<bool>;

    /// Runs `edit` on the current task groups with other writers to this user
    /// held off, then stores the result and bumps the version if `edit`
    /// returned `true`
    ///
    /// Returns `false` if no user has this id.
    async fn update_task_groups<'a>(&self, id: Uuid, edit: GroupsEdit<'a>) -> StoreResult<bool>;
}
