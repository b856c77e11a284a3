/// Data model
///
/// # Models
///
/// - `user`: User accounts with their embedded task hierarchy
/// - `task_group`: Task groups and the tasks inside them

pub mod task_group;
pub mod user;

pub use task_group::{Task, TaskGroup};
pub use user::{AccountStatus, NewUser, User};
