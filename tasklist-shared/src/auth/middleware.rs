/// Bearer token extraction for Axum
///
/// A session token is accepted from two places, in this order:
///
/// 1. `Authorization: Bearer <token>`
/// 2. an `access_token` cookie whose value is `Bearer <token>` (optionally
///    quoted), as set by the login endpoint
///
/// After the token is resolved to a user, the API inserts [`CurrentUser`] into
/// the request extensions; handlers take it with `Extension<CurrentUser>`.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use tasklist_shared::auth::middleware::CurrentUser;
///
/// async fn handler(Extension(CurrentUser(user)): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.username)
/// }
/// ```

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::models::User;

/// Name of the cookie carrying the session token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticated user, added to request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Error type for credential extraction
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Neither header nor cookie present
    MissingCredentials,

    /// Header or cookie present but not a bearer token
    InvalidFormat(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Not authenticated").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

/// Pulls the raw session token out of the request headers
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| AuthError::InvalidFormat("Invalid authorization header".to_string()))?;
        return strip_bearer(value);
    }

    let cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
        .map(|(_, value)| value.trim_matches('"'))
        .ok_or(AuthError::MissingCredentials)?;

    strip_bearer(cookie)
}

/// `Set-Cookie` value carrying a session token
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}=\"Bearer {}\"; HttpOnly; Path=/; SameSite=Lax",
        ACCESS_TOKEN_COOKIE, token
    )
}

fn strip_bearer(value: &str) -> Result<String, AuthError> {
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def");
    }

    #[test]
    fn test_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=\"Bearer abc.def\""),
        );
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def");
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=Bearer from-cookie"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "from-header");
    }

    #[test]
    fn test_missing_and_malformed() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        );

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_session_cookie_round_trips_through_extraction() {
        let cookie = session_cookie("tok");
        let pair = cookie.split(';').next().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        assert_eq!(extract_bearer_token(&headers).unwrap(), "tok");
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
