/// API route handlers
///
/// - `health`: health check
/// - `auth`: registration, confirmation, login, password reset
/// - `users`: current user
/// - `task_groups`: task groups and tasks

pub mod auth;
pub mod health;
pub mod task_groups;
pub mod users;
