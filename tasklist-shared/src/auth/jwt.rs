/// Signed token issuance and verification
///
/// Bearer tokens are HS256-signed JWTs. A token carries its subject (username
/// for sessions, email for confirmation and password reset), an expiry, and an
/// optional purpose tag that restricts which verification routine accepts it.
///
/// # Token Kinds
///
/// | Kind               | Subject  | Purpose tag        | Default TTL |
/// |--------------------|----------|--------------------|-------------|
/// | Session            | username | none               | 30 minutes  |
/// | Email confirmation | email    | `email_confirmation` | 24 hours  |
/// | Password reset     | email    | `password_reset`   | 15 minutes  |
///
/// Session verification (`TokenService::verify`) rejects purpose-tagged
/// tokens, so neither a confirmation link nor a reset link can be replayed as
/// a session.
///
/// Expiry is checked with zero leeway: a token whose `exp` is not strictly in
/// the future is expired.
///
/// # Example
///
/// ```
/// use tasklist_shared::auth::jwt::TokenService;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new("test-secret-key-at-least-32-bytes-long");
///
/// let token = tokens.issue_session("alice")?;
/// assert_eq!(tokens.verify(&token)?, "alice");
///
/// let reset = tokens.issue_password_reset("alice@example.com")?;
/// assert!(tokens.verify(&reset).is_err());
/// assert_eq!(tokens.verify_password_reset(&reset)?, "alice@example.com");
///
/// let confirm = tokens.issue_email_confirmation("alice@example.com")?;
/// assert!(tokens.verify(&confirm).is_err());
/// assert_eq!(tokens.verify_email_confirmation(&confirm)?, "alice@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Issuer claim stamped on every token
pub const ISSUER: &str = "tasklist";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer")]
    InvalidIssuer,

    /// Purpose tag does not match the verification routine
    #[error("Invalid token type")]
    WrongPurpose,

    /// Subject claim missing or empty
    #[error("Token has no subject")]
    MissingSubject,
}

/// Purpose tag restricting where a token may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// Accepted only by `verify_email_confirmation`
    EmailConfirmation,

    /// Accepted only by `verify_password_reset`
    PasswordReset,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - username or email depending on token kind
    #[serde(default)]
    pub sub: String,

    /// Issuer - always "tasklist"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Purpose tag, absent for session tokens
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub purpose: Option<TokenPurpose>,
}

impl Claims {
    /// Creates claims expiring `ttl` from now
    pub fn new(subject: impl Into<String>, purpose: Option<TokenPurpose>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            purpose,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates signature, issuer and expiry, returning the claims
///
/// Purpose and subject are not checked here; see `TokenService`.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    // The library accepts exp == now; sessions must not.
    if token_data.claims.is_expired() {
        return Err(JwtError::Expired);
    }

    Ok(token_data.claims)
}

/// Issues and verifies all token kinds with one process-wide secret
///
/// Constructed once at startup from configuration and shared by clone.
#[derive(Clone)]
pub struct TokenService {
    secret: Arc<str>,
    session_ttl: Duration,
}

impl TokenService {
    /// Session token lifetime unless overridden
    pub const SESSION_TTL_MINUTES: i64 = 30;

    /// Email confirmation token lifetime
    pub const CONFIRMATION_TTL_HOURS: i64 = 24;

    /// Password reset token lifetime
    pub const PASSWORD_RESET_TTL_MINUTES: i64 = 15;

    /// Creates a token service with the default session TTL
    pub fn new(secret: impl Into<String>) -> Self {
        let secret: String = secret.into();
        Self {
            secret: Arc::from(secret),
            session_ttl: Duration::minutes(Self::SESSION_TTL_MINUTES),
        }
    }

    /// Overrides the session token lifetime
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Current session token lifetime
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Issues a token for `subject` expiring after `ttl`
    pub fn issue(
        &self,
        subject: &str,
        purpose: Option<TokenPurpose>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        create_token(&Claims::new(subject, purpose, ttl), &self.secret)
    }

    /// Issues a session token whose subject is the username
    pub fn issue_session(&self, username: &str) -> Result<String, JwtError> {
        self.issue(username, None, self.session_ttl)
    }

    /// Issues a 24 hour email confirmation token whose subject is the email
    pub fn issue_email_confirmation(&self, email: &str) -> Result<String, JwtError> {
        self.issue(
            email,
            Some(TokenPurpose::EmailConfirmation),
            Duration::hours(Self::CONFIRMATION_TTL_HOURS),
        )
    }

    /// Issues a 15 minute password reset token whose subject is the email
    pub fn issue_password_reset(&self, email: &str) -> Result<String, JwtError> {
        self.issue(
            email,
            Some(TokenPurpose::PasswordReset),
            Duration::minutes(Self::PASSWORD_RESET_TTL_MINUTES),
        )
    }

    /// Verifies a session token and returns the username
    pub fn verify(&self, token: &str) -> Result<String, JwtError> {
        self.verify_with_purpose(token, None)
    }

    /// Verifies an email confirmation token and returns the email
    pub fn verify_email_confirmation(&self, token: &str) -> Result<String, JwtError> {
        self.verify_with_purpose(token, Some(TokenPurpose::EmailConfirmation))
    }

    /// Verifies a password reset token and returns the email it was issued for
    pub fn verify_password_reset(&self, token: &str) -> Result<String, JwtError> {
        self.verify_with_purpose(token, Some(TokenPurpose::PasswordReset))
    }

    fn verify_with_purpose(
        &self,
        token: &str,
        purpose: Option<TokenPurpose>,
    ) -> Result<String, JwtError> {
        let claims = validate_token(token, &self.secret)?;

        if claims.purpose != purpose {
            return Err(JwtError::WrongPurpose);
        }
        if claims.sub.is_empty() {
            return Err(JwtError::MissingSubject);
        }

        Ok(claims.sub)
    }
}
