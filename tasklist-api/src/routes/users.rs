/// Current user endpoint
///
/// ```text
/// GET /users/me  ->  { "username": "alice" }
/// ```

use axum::{Extension, Json};
use serde::Serialize;
use tasklist_shared::auth::middleware::CurrentUser;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
}

pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.username,
    })
}
