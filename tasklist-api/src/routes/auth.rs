/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Create a pending account, mail a confirmation link
/// - `GET  /auth/confirm?token=` - Activate the account
/// - `POST /auth/token` - Login (form), returns and sets the session token
/// - `POST /auth/forgot-password` - Mail a password reset link
/// - `GET  /auth/reset-password?token=` - HTML form for choosing a new password
/// - `POST /auth/reset-password` - Store the new password (form)

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tasklist_shared::{accounts::Session, auth::middleware::session_cookie};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Login form (`application/x-www-form-urlencoded`)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Forgot password request
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Reset password form
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub new_password: String,
}

/// `?token=` query
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn validate<T: Validate>(req: &T) -> ApiResult<()> {
    req.validate().map_err(|e| {
        let message = e
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .filter_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Validation failed".to_string());
        ApiError::BadRequest(message)
    })
}

/// Register a new user
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// { "username": "alice", "email": "alice@example.com", "password": "..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: empty username or password, malformed email
/// - `409 Conflict`: username or email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validate(&req)?;

    state
        .accounts
        .register(&req.username, &req.email, &req.password, &state.config.api.public_url)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered. Please check your email to confirm your account.",
        }),
    ))
}

/// Confirm the email address of a pending account
pub async fn confirm(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> ApiResult<Json<MessageResponse>> {
    state.accounts.confirm_email(&query.token).await?;

    Ok(Json(MessageResponse {
        message: "Email confirmed",
    }))
}

/// Login
///
/// Responds with `{ "access_token": "...", "token_type": "bearer" }` and
/// also sets the token as an HttpOnly `access_token` cookie.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown user, wrong or empty password
/// - `403 Forbidden`: email not yet confirmed
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<impl IntoResponse> {
    let session: Session = state.accounts.login(&form.username, &form.password).await?;
    let cookie = session_cookie(&session.access_token);

    Ok(([(header::SET_COOKIE, cookie)], Json(session)))
}

/// Mail a password reset link
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate(&req)?;

    state
        .accounts
        .forgot_password(&req.email, &state.config.api.public_url)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password reset link sent to your email",
    }))
}

/// Render the reset form for a valid token
pub async fn reset_password_form(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Html<String> {
    if state.accounts.verify_reset_token(&query.token).is_err() {
        return Html("Invalid or expired token".to_string());
    }

    Html(format!(
        r#"<form action="/auth/reset-password" method="post">
    <input type="hidden" name="token" value="{}">
    <input type="password" name="new_password" required>
    <button type="submit">Reset Password</button>
</form>"#,
        query.token
    ))
}

/// Store a new password
pub async fn reset_password(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .accounts
        .reset_password(&form.token, &form.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}
