/// In-memory user store
///
/// Holds user documents in a `HashMap` behind a tokio `RwLock`. Every
/// operation takes the lock for its whole read-check-write, which gives the
/// same per-document atomicity as the row locks of the PostgreSQL store. Used by tests and by the server when no database is configured.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{GroupsEdit, StoreError, StoreResult, UserStore};
use crate::models::{NewUser, User};

/// Map-backed `UserStore`
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no users
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, data: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == data.username) {
            return Err(StoreError::Conflict("Username already registered".to_string()));
        }
        if users.values().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict("Email already registered".to_string()));
        }

        let user = User::register(data);
        users.insert(user.id, user.clone());

        debug!(user_id = %user.id, "Stored new user");
        Ok(user)
    }

    async fn activate(&self, email: &str) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        match users.values_mut().find(|u| u.email == email) {
            Some(user) => {
                user.is_active = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_password_hash(&self, email: &str, password_hash: &str) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        match users.values_mut().find(|u| u.email == email) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_task_groups<'a>(&self, id: Uuid, edit: GroupsEdit<'a>) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(false);
        };

        let mut groups = user.task_groups.clone();
        if edit(&mut groups) {
            user.task_groups = groups;
            user.version += 1;
            debug!(user_id = %id, version = user.version, "Task groups written");
        }
        Ok(true)
    }
}
