/// Pure task hierarchy logic
///
/// `TaskBoard` wraps one user's task-group list and applies structural
/// changes to it in memory. It owns all ordering rules:
///
/// - group titles are unique per user, task titles unique per group
///   (case-sensitive exact match)
/// - new entries get `max(order_num) + 1`, or 1 when the parent is empty
/// - deleting an entry decrements every sibling ranked after it, so order
///   numbers stay exactly `1..=N`
/// - renames keep id and order number
///
/// No I/O happens here; `TaskService` persists the resulting list.

use crate::error::{DomainError, DomainResult};
use crate::models::{Task, TaskGroup};

/// Finds a group by exact title
pub fn find_group<'a>(groups: &'a [TaskGroup], title: &str) -> Option<&'a TaskGroup> {
    groups.iter().find(|g| g.title == title)
}

/// Finds a task in a group by exact title
pub fn find_task<'a>(group: &'a TaskGroup, title: &str) -> Option<&'a Task> {
    group.task(title)
}

/// Mutable view over a user's task groups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBoard {
    groups: Vec<TaskGroup>,
}

impl TaskBoard {
    pub fn new(groups: Vec<TaskGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[TaskGroup] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<TaskGroup> {
        self.groups
    }

    pub fn group(&self, title: &str) -> Option<&TaskGroup> {
        find_group(&self.groups, title)
    }

    fn group_mut(&mut self, title: &str) -> DomainResult<&mut TaskGroup> {
        self.groups
            .iter_mut()
            .find(|g| g.title == title)
            .ok_or_else(|| DomainError::NotFound("Group not found".to_string()))
    }

    /// Appends a new, empty group after all existing ones
    pub fn create_group(&mut self, title: &str) -> DomainResult<TaskGroup> {
        if title.is_empty() {
            return Err(DomainError::InvalidArgument(
                "Group title must not be empty".to_string(),
            ));
        }
        if self.group(title).is_some() {
            return Err(DomainError::Conflict(format!("{} already exists.", title)));
        }

        let order_num = next_order(self.groups.iter().map(|g| g.order_num));
        let group = TaskGroup::new(title, order_num)?;
        self.groups.push(group.clone());

        Ok(group)
    }

    /// Renames a group in place
    pub fn rename_group(&mut self, old_title: &str, new_title: &str) -> DomainResult<&TaskGroup> {
        if old_title.is_empty() || new_title.is_empty() {
            return Err(DomainError::InvalidArgument(
                "Group titles must not be empty".to_string(),
            ));
        }
        if old_title == new_title {
            return Err(DomainError::InvalidArgument(
                "New group title must differ from the current one".to_string(),
            ));
        }
        if self.group(old_title).is_none() {
            return Err(DomainError::NotFound("Group not found".to_string()));
        }
        if self.group(new_title).is_some() {
            return Err(DomainError::Conflict(format!("{} already exists.", new_title)));
        }

        let group = self.group_mut(old_title)?;
        group.title = new_title.to_string();
        Ok(group)
    }

    /// Removes a group and closes the gap in the order numbers
    pub fn delete_group(&mut self, title: &str) -> DomainResult<TaskGroup> {
        let index = self
            .groups
            .iter()
            .position(|g| g.title == title)
            .ok_or_else(|| DomainError::NotFound("Group not found".to_string()))?;

        let removed = self.groups.remove(index);
        for group in &mut self.groups {
            if group.order_num > removed.order_num {
                group.order_num -= 1;
            }
        }

        Ok(removed)
    }

    /// Appends a task to the end of a group
    pub fn create_task(
        &mut self,
        group_title: &str,
        task_title: &str,
        description: &str,
    ) -> DomainResult<Task> {
        let group = self.group_mut(group_title)?;

        if task_title.is_empty() {
            return Err(DomainError::InvalidArgument(
                "Task title must not be empty".to_string(),
            ));
        }
        if group.task(task_title).is_some() {
            return Err(DomainError::Conflict(format!(
                "{} already exists in {}.",
                task_title, group_title
            )));
        }

        let order_num = next_order(group.tasks.iter().map(|t| t.order_num));
        let task = Task::new(task_title, description, order_num)?;
        group.tasks.push(task.clone());

        Ok(task)
    }

    /// Removes a task and closes the gap in its group's order numbers
    pub fn delete_task(&mut self, group_title: &str, task_title: &str) -> DomainResult<Task> {
        let group = self.group_mut(group_title)?;

        let index = group
            .tasks
            .iter()
            .position(|t| t.title == task_title)
            .ok_or_else(|| DomainError::NotFound("Task not found".to_string()))?;

        let removed = group.tasks.remove(index);
        for task in &mut group.tasks {
            if task.order_num > removed.order_num {
                task.order_num -= 1;
            }
        }

        Ok(removed)
    }
}

fn next_order(existing: impl Iterator<Item = u32>) -> u32 {
    existing.max().unwrap_or(0) + 1
}
