/// Session authentication for protected routes
///
/// Resolves the bearer token (header or cookie) to a stored user and inserts
/// [`CurrentUser`] into the request extensions. Any failure short-circuits
/// with the matching `ApiError` (401 for token problems, 404 if the token's
/// user no longer exists).

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tasklist_shared::auth::middleware::{extract_bearer_token, CurrentUser};
use tracing::debug;

use crate::{app::AppState, error::ApiError};

pub async fn auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(req.headers())?;
    let user = state.accounts.authenticate(&token).await?;

    debug!(username = %user.username, "Request authenticated");
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
