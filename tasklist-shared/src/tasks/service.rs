/// Persisted task hierarchy operations
///
/// Every mutation is one edit of one user document, run by the store while it
/// holds that document:
///
/// ```text
/// update_task_groups(id, edit)
///   ├─> current groups (never the request snapshot)
///   ├─> apply change to a TaskBoard     (validation + renumbering)
///   ├─> Ok  -> write back, bump version
///   └─> Err -> discard, nothing written
/// ```
///
/// Concurrent mutations for one user therefore queue at the store rather than
/// racing. A delete and the renumbering it triggers land in the same write, and
/// uniqueness checks always see every earlier write.

use std::sync::Arc;
use tracing::{debug, info};

use super::board::{find_group, find_task, TaskBoard};
use crate::error::{DomainError, DomainResult};
use crate::models::{Task, TaskGroup, User};
use crate::store::{GroupsEdit, UserStore};

/// Task hierarchy engine bound to a store
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn UserStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// All groups of the user, in order
    pub fn list_groups(user: &User) -> &[TaskGroup] {
        &user.task_groups
    }

    /// Group lookup against the request snapshot (no store round-trip)
    pub fn get_group<'a>(user: &'a User, title: &str) -> Option<&'a TaskGroup> {
        find_group(&user.task_groups, title)
    }

    /// Task lookup inside an already-resolved group
    pub fn get_task<'a>(group: &'a TaskGroup, title: &str) -> Option<&'a Task> {
        find_task(group, title)
    }

    pub async fn create_group(&self, user: &User, title: &str) -> DomainResult<TaskGroup> {
        let group = self.apply(user, |board| board.create_group(title)).await?;

        info!(
            username = %user.username,
            group = %group.title,
            order_num = group.order_num,
            "Created task group"
        );
        Ok(group)
    }

    pub async fn rename_group(
        &self,
        user: &User,
        old_title: &str,
        new_title: &str,
    ) -> DomainResult<TaskGroup> {
        let group = self
            .apply(user, |board| {
                board.rename_group(old_title, new_title).map(Clone::clone)
            })
            .await?;

        info!(
            username = %user.username,
            from = old_title,
            to = new_title,
            "Renamed task group"
        );
        Ok(group)
    }

    pub async fn delete_group(&self, user: &User, title: &str) -> DomainResult<TaskGroup> {
        let removed = self.apply(user, |board| board.delete_group(title)).await?;

        info!(username = %user.username, group = title, "Deleted task group");
        Ok(removed)
    }

    pub async fn create_task(
        &self,
        user: &User,
        group_title: &str,
        task_title: &str,
        description: &str,
    ) -> DomainResult<Task> {
        let task = self
            .apply(user, |board| {
                board.create_task(group_title, task_title, description)
            })
            .await?;

        info!(
            username = %user.username,
            group = group_title,
            task = %task.title,
            order_num = task.order_num,
            "Created task"
        );
        Ok(task)
    }

    pub async fn delete_task(
        &self,
        user: &User,
        group_title: &str,
        task_title: &str,
    ) -> DomainResult<Task> {
        let removed = self
            .apply(user, |board| board.delete_task(group_title, task_title))
            .await?;

        info!(
            username = %user.username,
            group = group_title,
            task = task_title,
            "Deleted task"
        );
        Ok(removed)
    }

    async fn apply<T, F>(&self, user: &User, change: F) -> DomainResult<T>
    where
        F: FnOnce(&mut TaskBoard) -> DomainResult<T> + Send,
        T: Send,
    {
        let mut outcome = None;
        let edit: GroupsEdit<'_> = Box::new(|groups: &mut Vec<TaskGroup>| {
            let mut board = TaskBoard::new(std::mem::take(groups));
            let result = change(&mut board);
            *groups = board.into_groups();

            let commit = result.is_ok();
            outcome = Some(result);
            commit
        });

        if !self.store.update_task_groups(user.id, edit).await? {
            return Err(DomainError::NotFound("User not found".to_string()));
        }

        let result = outcome.unwrap_or_else(|| {
            Err(DomainError::Store("Task group edit was not run".to_string()))
        });
        if result.is_ok() {
            debug!(user_id = %user.id, "Task hierarchy updated");
        }
        result
    }
}
