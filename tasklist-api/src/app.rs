/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasklist_api::{app::{build_router, AppState}, config::Config};
/// use tasklist_shared::{mail::recording::RecordingMailer, store::memory::MemoryUserStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(
///     Arc::new(MemoryUserStore::new()),
///     Arc::new(RecordingMailer::new()),
///     config,
/// );
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
/// axum::serve(listener, build_router(state)).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use chrono::Duration;
use std::sync::Arc;
use tasklist_shared::{
    accounts::AccountService, auth::jwt::TokenService, mail::Mailer, store::UserStore,
    tasks::TaskService,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub accounts: AccountService,
    pub tasks: TaskService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, mailer: Arc<dyn Mailer>, config: Config) -> Self {
        let tokens = TokenService::new(config.jwt.secret.clone())
            .with_session_ttl(Duration::minutes(config.jwt.access_token_expire_minutes));

        Self {
            accounts: AccountService::new(store.clone(), tokens, mailer),
            tasks: TaskService::new(store.clone()),
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health
/// ├── /auth/
/// │   ├── POST /register
/// │   ├── GET  /confirm
/// │   ├── POST /token
/// │   ├── POST /forgot-password
/// │   └── GET|POST /reset-password
/// ├── GET  /users/me                      (bearer)
/// └── /task-groups/                       (bearer)
///     ├── GET  /
///     ├── POST|GET|PUT|DELETE /:group_name
///     └── POST|GET|DELETE /:group_name/:task_name
/// ```
///
/// Middleware, outermost first: security headers, CORS, tracing, and
/// session authentication on the bearer routes.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/confirm", get(routes::auth::confirm))
        .route("/auth/token", post(routes::auth::login))
        .route("/auth/forgot-password", post(routes::auth::forgot_password))
        .route(
            "/auth/reset-password",
            get(routes::auth::reset_password_form).post(routes::auth::reset_password),
        );

    let protected_routes = Router::new()
        .route("/users/me", get(routes::users::me))
        .route("/task-groups/", get(routes::task_groups::list_groups))
        .route(
            "/task-groups/:group_name",
            post(routes::task_groups::create_group)
                .get(routes::task_groups::get_group)
                .put(routes::task_groups::rename_group)
                .delete(routes::task_groups::delete_group),
        )
        .route(
            "/task-groups/:group_name/:task_name",
            post(routes::task_groups::create_task)
                .get(routes::task_groups::get_task)
                .delete(routes::task_groups::delete_task),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_layer,
        ));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
