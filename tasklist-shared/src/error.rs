/// Domain error taxonomy
///
/// Every business operation in this crate (token verification, account flows,
/// task hierarchy mutations) fails with one of these kinds. The API layer maps
/// each kind onto a distinct HTTP status; only `Store` is treated as an
/// unexpected fault whose detail is never shown to clients.
///
/// Module-level errors (`JwtError`, `PasswordError`, `StoreError`) convert into
/// `DomainError` via `From`, so services can use `?` throughout.

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Result alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Failure kinds surfaced to callers
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Malformed input, e.g. an empty title
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing user, group, task or token subject
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad signature, malformed, expired, or wrong purpose
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Login attempted before email confirmation
    #[error("Account not activated")]
    AccountInactive,

    /// Unknown user, wrong or empty password
    #[error("Incorrect username or password")]
    InvalidCredential,

    /// Backing store failure, not further classified
    #[error("Store error: {0}")]
    Store(String),
}

impl From<JwtError> for DomainError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => DomainError::Store(msg),
            other => DomainError::InvalidToken(other.to_string()),
        }
    }
}

impl From<PasswordError> for DomainError {
    fn from(err: PasswordError) -> Self {
        DomainError::Store(format!("Password operation failed: {}", err))
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => DomainError::Conflict(msg),
            StoreError::NotFound(msg) => DomainError::NotFound(msg),
            other => DomainError::Store(other.to_string()),
        }
    }
}
