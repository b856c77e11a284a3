/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: signed token issuance and purpose-checked verification
/// - [`middleware`]: bearer token extraction for Axum requests
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::auth::password::{hash_password, verify_password};
/// use tasklist_shared::auth::jwt::TokenService;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let tokens = TokenService::new("secret-key-that-is-at-least-32-bytes");
/// let token = tokens.issue_session("alice")?;
/// assert_eq!(tokens.verify(&token)?, "alice");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
