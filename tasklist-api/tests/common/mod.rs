/// Common test utilities for integration tests
///
/// Builds the full router over the in-memory store and a recording mailer,
/// and provides helpers to drive it request by request.

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use tasklist_api::app::{build_router, AppState};
use tasklist_api::config::Config;
use tasklist_shared::mail::recording::RecordingMailer;
use tasklist_shared::store::memory::MemoryUserStore;
use tower::Service as _;

pub const SECRET: &str = "integration-test-secret-key-32-bytes!";
pub const PASSWORD: &str = "correct horse battery staple";

/// Response parts the tests look at
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryUserStore>,
    pub mailer: Arc<RecordingMailer>,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let vars: HashMap<String, String> = [("SECRET_KEY", SECRET)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = Config::from_vars(&vars).unwrap();

        let store = Arc::new(MemoryUserStore::new());
        let mailer = Arc::new(RecordingMailer::new());
        let state = AppState::new(store.clone(), mailer.clone(), config.clone());

        TestContext {
            store,
            mailer,
            app: build_router(state),
            config,
        }
    }

    /// Sends one request through the router
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<(&str, String)>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some((content_type, body)) => builder
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).to_string(),
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.send(Method::POST, uri, None, Some(("application/json", body.to_string())))
            .await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).expect("Failed to encode form");
        self.send(
            Method::POST,
            uri,
            None,
            Some(("application/x-www-form-urlencoded", body)),
        )
        .await
    }

    pub async fn register(&self, username: &str) -> TestResponse {
        self.post_json(
            "/auth/register",
            serde_json::json!({
                "username": username,
                "email": email_of(username),
                "password": PASSWORD,
            }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post_form("/auth/token", &[("username", username), ("password", password)])
            .await
    }

    /// Path and query of the newest emailed link with the given subject
    pub async fn emailed_link(&self, to: &str, subject: &str) -> String {
        let mailer = self.mailer.clone();
        let (to_owned, subject_owned) = (to.to_string(), subject.to_string());
        wait_for(
            || {
                let mailer = mailer.clone();
                let (to, subject) = (to_owned.clone(), subject_owned.clone());
                async move {
                    mailer
                        .sent()
                        .iter()
                        .any(|e| e.to == to && e.subject == subject)
                }
            },
            5,
        )
        .await
        .unwrap();

        let email = self
            .mailer
            .sent()
            .into_iter()
            .rev()
            .find(|e| e.to == to && e.subject == subject)
            .unwrap();
        let url = email
            .body
            .split_whitespace()
            .find(|word| word.starts_with(&self.config.api.public_url))
            .unwrap();

        format!("/{}", &url[self.config.api.public_url.len()..])
    }

    /// Registers, confirms and logs in; returns the session token
    pub async fn signed_in(&self, username: &str) -> String {
        assert_eq!(self.register(username).await.status, StatusCode::CREATED);

        let link = self.emailed_link(&email_of(username), "Confirm your email").await;
        assert_eq!(self.get(&link, None).await.status, StatusCode::OK);

        let response = self.login(username, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()["access_token"].as_str().unwrap().to_string()
    }
}

pub fn email_of(username: &str) -> String {
    format!("{}@example.com", username)
}

/// Helper to wait for condition with timeout
pub async fn wait_for<F, Fut>(condition: F, timeout_secs: u64) -> anyhow::Result<()>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_secs(timeout_secs);

    loop {
        if condition().await {
            return Ok(());
        }

        if start.elapsed() > timeout {
            anyhow::bail!("Condition not met within {} seconds", timeout_secs);
        }

        tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
    }
}
