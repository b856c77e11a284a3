/// Task group and task records
///
/// Both live inside the owning user's document; neither exists on its own.
/// Order numbers are dense and 1-based within their parent: a user's groups
/// are numbered `1..=N`, and so are the tasks of each group. The vectors are
/// kept sorted by order number, so position `i` holds order `i + 1`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Status given to every new task
pub const DEFAULT_TASK_STATUS: &str = "pending";

/// Named, ordered container of tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskGroup {
    pub id: Uuid,

    /// Unique among the owner's groups (case-sensitive)
    pub title: String,

    /// Dense 1-based rank among the owner's groups
    pub order_num: u32,

    /// Tasks, ordered by `order_num`
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskGroup {
    /// Creates an empty group at the given position
    pub fn new(title: impl Into<String>, order_num: u32) -> DomainResult<Self> {
        let title = title.into();
        require_title(&title, "Group title")?;
        require_order(order_num)?;

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            order_num,
            tasks: Vec::new(),
        })
    }

    /// Looks up a task by exact title
    pub fn task(&self, title: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.title == title)
    }
}

/// Named unit of work inside a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,

    /// Unique within the owning group
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Dense 1-based rank within the owning group
    pub order_num: u32,

    #[serde(default = "default_status")]
    pub status: String,

    pub created_at: DateTime<Utc>,
}

fn default_status() -> String {
    DEFAULT_TASK_STATUS.to_string()
}

impl Task {
    /// Creates a pending task at the given position
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        order_num: u32,
    ) -> DomainResult<Self> {
        let title = title.into();
        require_title(&title, "Task title")?;
        require_order(order_num)?;

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: description.into(),
            order_num,
            status: default_status(),
            created_at: Utc::now(),
        })
    }
}

fn require_title(title: &str, what: &str) -> DomainResult<()> {
    if title.is_empty() {
        return Err(DomainError::InvalidArgument(format!("{} must not be empty", what)));
    }
    Ok(())
}

fn require_order(order_num: u32) -> DomainResult<()> {
    if order_num == 0 {
        return Err(DomainError::InvalidArgument(
            "Order numbers start at 1".to_string(),
        ));
    }
    Ok(())
}
