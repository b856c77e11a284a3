/// Middleware modules for the API server
///
/// - `security`: security response headers
/// - `auth`: bearer session authentication for protected routes

pub mod auth;
pub mod security;
