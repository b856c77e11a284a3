/// Integration tests for the tasklist API
///
/// Drive the full router (in-memory store, recording mailer):
/// - account lifecycle: register, confirm, login, password reset
/// - bearer and cookie authentication
/// - task group and task CRUD with dense ordering
/// - error status mapping

mod common;

use axum::http::{header, Method, StatusCode};
use common::{email_of, TestContext, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();

    let response = ctx.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
    assert_eq!(response.headers.get("x-content-type-options").unwrap(), "nosniff");
}

#[tokio::test]
async fn test_register_confirm_login_flow() {
    let ctx = TestContext::new();

    let response = ctx.register("alice").await;
    assert_eq!(response.status, StatusCode::CREATED);

    // Not confirmed yet
    let response = ctx.login("alice", PASSWORD).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json()["error"], "account_inactive");

    let link = ctx.emailed_link(&email_of("alice"), "Confirm your email").await;
    assert!(link.starts_with("/auth/confirm?token="));

    // A confirmation token is not a session
    let confirm_token = link.trim_start_matches("/auth/confirm?token=");
    let response = ctx.get("/users/me", Some(confirm_token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx.get(&link, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], "Email confirmed");

    let response = ctx.login("alice", PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap();

    let cookie = response.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with(&format!("access_token=\"Bearer {}\"", token)));
    assert!(cookie.contains("HttpOnly"));

    let response = ctx.get("/users/me", Some(token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "username": "alice" }));
}

#[tokio::test]
async fn test_register_validation_and_conflicts() {
    let ctx = TestContext::new();
    ctx.register("alice").await;

    let response = ctx
        .post_json(
            "/auth/register",
            json!({ "username": "alice", "email": "other@example.com", "password": "pw" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json()["message"], "Username already registered");

    let response = ctx
        .post_json(
            "/auth/register",
            json!({ "username": "bob", "email": "alice@example.com", "password": "pw" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json()["message"], "Email already registered");

    let response = ctx
        .post_json(
            "/auth/register",
            json!({ "username": "carol", "email": "not-an-email", "password": "pw" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx
        .post_json(
            "/auth/register",
            json!({ "username": "carol", "email": "carol@example.com", "password": "" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let ctx = TestContext::new();
    ctx.signed_in("alice").await;

    for (username, password) in [("alice", "wrong"), ("alice", ""), ("nobody", PASSWORD)] {
        let response = ctx.login(username, password).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.json()["error"], "invalid_credentials");
    }
}

#[tokio::test]
async fn test_confirm_with_invalid_token() {
    let ctx = TestContext::new();

    let response = ctx.get("/auth/confirm?token=garbage", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"], "invalid_token");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new();

    let response = ctx.get("/users/me", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let response = ctx.get("/task-groups/", Some("not-a-token")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_authentication() {
    let ctx = TestContext::new();
    let token = ctx.signed_in("alice").await;

    let request = axum::http::Request::builder()
        .uri("/users/me")
        .header(header::COOKIE, format!("access_token=\"Bearer {}\"", token))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(ctx.app.clone(), request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let ctx = TestContext::new();
    ctx.signed_in("alice").await;

    let response = ctx
        .post_json("/auth/forgot-password", json!({ "email": "alice@example.com" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let link = ctx.emailed_link(&email_of("alice"), "Password Reset Request").await;
    assert!(link.starts_with("/auth/reset-password?token="));
    let token = link.trim_start_matches("/auth/reset-password?token=").to_string();

    // A reset token is not a session
    let response = ctx.get("/users/me", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let form = ctx.get(&link, None).await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains("<form"));
    assert!(form.body.contains(&token));

    let response = ctx
        .post_form(
            "/auth/reset-password",
            &[("token", &token), ("new_password", "brand new")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert_eq!(ctx.login("alice", PASSWORD).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.login("alice", "brand new").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_password_reset_rejections() {
    let ctx = TestContext::new();
    let session = ctx.signed_in("alice").await;

    let response = ctx.get("/auth/reset-password?token=garbage", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "Invalid or expired token");

    // Session tokens cannot reset passwords
    let response = ctx
        .post_form(
            "/auth/reset-password",
            &[("token", &session), ("new_password", "x")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx
        .post_json("/auth/forgot-password", json!({ "email": "ghost@example.com" }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_group_lifecycle() {
    let ctx = TestContext::new();
    let token = ctx.signed_in("alice").await;
    let token = Some(token.as_str());

    for (i, title) in ["first", "second", "third"].iter().enumerate() {
        let response = ctx
            .send(Method::POST, &format!("/task-groups/{}", title), token, None)
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.json()["title"], *title);
        assert_eq!(response.json()["order_num"], i as u64 + 1);
    }

    let response = ctx.send(Method::POST, "/task-groups/first", token, None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = ctx.get("/task-groups/second", token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["tasks"], json!([]));

    let response = ctx
        .send(Method::PUT, "/task-groups/second?new_group_name=third", token, None)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = ctx
        .send(Method::PUT, "/task-groups/second?new_group_name=middle", token, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["order_num"], 2);
    assert_eq!(ctx.get("/task-groups/second", token).await.status, StatusCode::NOT_FOUND);

    let response = ctx.send(Method::DELETE, "/task-groups/first", token, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let groups = ctx.get("/task-groups/", token).await.json();
    let summary: Vec<(String, u64)> = groups
        .as_array()
        .unwrap()
        .iter()
        .map(|g| {
            (
                g["title"].as_str().unwrap().to_string(),
                g["order_num"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![("middle".to_string(), 1), ("third".to_string(), 2)]
    );

    let response = ctx.send(Method::DELETE, "/task-groups/missing", token, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_lifecycle() {
    let ctx = TestContext::new();
    let token = ctx.signed_in("alice").await;
    let token = Some(token.as_str());

    ctx.send(Method::POST, "/task-groups/work", token, None).await;

    let response = ctx
        .send(Method::POST, "/task-groups/work/write?description=draft%20it", token, None)
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let task = response.json();
    assert_eq!(task["order_num"], 1);
    assert_eq!(task["status"], "pending");
    assert_eq!(task["description"], "draft it");

    let response = ctx.send(Method::POST, "/task-groups/work/review", token, None).await;
    assert_eq!(response.json()["order_num"], 2);
    assert_eq!(response.json()["description"], "");

    let response = ctx.send(Method::POST, "/task-groups/work/review", token, None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = ctx.send(Method::POST, "/task-groups/nope/review", token, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = ctx.send(Method::DELETE, "/task-groups/work/write", token, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = ctx.get("/task-groups/work/review", token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["order_num"], 1);

    assert_eq!(
        ctx.get("/task-groups/work/write", token).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_users_are_isolated() {
    let ctx = TestContext::new();
    let alice = ctx.signed_in("alice").await;
    let bob = ctx.signed_in("bob").await;

    ctx.send(Method::POST, "/task-groups/private", Some(&alice), None).await;

    assert_eq!(
        ctx.get("/task-groups/private", Some(&bob)).await.status,
        StatusCode::NOT_FOUND
    );
    // Same title is free for another user
    let response = ctx.send(Method::POST, "/task-groups/private", Some(&bob), None).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["order_num"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_task_creation() {
    let ctx = TestContext::new();
    let token = ctx.signed_in("alice").await;
    ctx.send(Method::POST, "/task-groups/work", Some(&token), None).await;

    let (a, b) = tokio::join!(
        ctx.send(Method::POST, "/task-groups/work/a", Some(&token), None),
        ctx.send(Method::POST, "/task-groups/work/b", Some(&token), None),
    );
    assert_eq!(a.status, StatusCode::CREATED);
    assert_eq!(b.status, StatusCode::CREATED);

    let mut orders = vec![
        a.json()["order_num"].as_u64().unwrap(),
        b.json()["order_num"].as_u64().unwrap(),
    ];
    orders.sort_unstable();
    assert_eq!(orders, vec![1, 2]);
}
