/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; any `DomainError` converts with `?` and
/// renders as `{ "error": code, "message": msg }`:
///
/// | Domain              | Status | `error`               |
/// |---------------------|--------|-----------------------|
/// | `InvalidArgument`   | 400    | `bad_request`         |
/// | `InvalidCredential` | 401    | `invalid_credentials` |
/// | `InvalidToken`      | 401    | `invalid_token`       |
/// | `AccountInactive`   | 403    | `account_inactive`    |
/// | `NotFound`          | 404    | `not_found`           |
/// | `Conflict`          | 409    | `conflict`            |
/// | `Store`             | 500    | `internal_error`      |
///
/// # Example
///
/// ```no_run
/// use tasklist_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler(title: String) -> ApiResult<Json<serde_json::Value>> {
///     if title.is_empty() {
///         return Err(ApiError::BadRequest("Title must not be empty".to_string()));
///     }
///     Ok(Json(json!({ "title": title })))
/// }
/// ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tasklist_shared::auth::middleware::AuthError;
use tasklist_shared::error::DomainError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Missing or malformed credentials (401)
    Unauthorized(String),

    /// Wrong username or password (401)
    InvalidCredentials,

    /// Bad, expired or misused token (401)
    InvalidToken(String),

    /// Login before email confirmation (403)
    AccountInactive,

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. duplicate title
    Conflict(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "bad_request", "conflict")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::InvalidCredentials => write!(f, "Incorrect username or password"),
            ApiError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            ApiError::AccountInactive => write!(f, "Account not activated"),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Incorrect username or password".to_string(),
            ),
            ApiError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, "invalid_token", msg),
            ApiError::AccountInactive => (
                StatusCode::FORBIDDEN,
                "account_inactive",
                "Account not activated. Please confirm your email.".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let unauthorized = status == StatusCode::UNAUTHORIZED;
        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        let mut response = (status, body).into_response();
        if unauthorized {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidArgument(msg) => ApiError::BadRequest(msg),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::InvalidToken(msg) => ApiError::InvalidToken(msg),
            DomainError::AccountInactive => ApiError::AccountInactive,
            DomainError::InvalidCredential => ApiError::InvalidCredentials,
            DomainError::Store(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::Unauthorized("Not authenticated".to_string()),
            AuthError::InvalidFormat(msg) => ApiError::Unauthorized(msg),
        }
    }
}
