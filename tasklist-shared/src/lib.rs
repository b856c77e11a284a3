//! # Tasklist Shared Library
//!
//! Domain types and business logic of the tasklist service, used by the API
//! server.
//!
//! ## Module Organization
//!
//! - `models`: users, task groups and tasks
//! - `store`: `UserStore` trait with in-memory and PostgreSQL backends
//! - `db`: PostgreSQL pool and schema bootstrap
//! - `auth`: password hashing, signed tokens, bearer extraction
//! - `mail`: confirmation and reset emails over SMTP
//! - `accounts`: registration, confirmation, login, password reset
//! - `tasks`: task group and task operations with dense ordering
//! - `error`: domain error taxonomy

pub mod accounts;
pub mod auth;
pub mod db;
pub mod error;
pub mod mail;
pub mod models;
pub mod store;
pub mod tasks;

/// Current version of the tasklist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
