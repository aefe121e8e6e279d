/// Integration tests for the Agora API
///
/// These tests exercise the full system end-to-end against a running
/// Postgres and Redis (all `#[ignore]`-marked for that reason):
/// - signup with duplicate and mismatch rejections
/// - login/logout session lifecycle, including token revocation
/// - the access-token guard on protected routes
/// - board and comment CRUD with ownership checks
/// - admin-only report listings

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;
use tower::Service as _;

use agora_shared::auth::jwt;

/// Duplicate username, duplicate nickname, and password mismatch at signup
#[tokio::test]
#[ignore] // Requires running Postgres and Redis
async fn test_signup_rejections() {
    let mut ctx = TestContext::new().await.unwrap();

    // Same username again
    let response = ctx
        .app
        .call(
            Request::builder()
                .method("POST")
                .uri("/api/users/signup")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "username": ctx.username,
                        "nickname": "someone-else",
                        "password": "another-password-1",
                        "confirmPassword": "another-password-1",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["code"], "DUPLICATED_USERNAME");

    // Mismatched confirmation
    let response = ctx
        .app
        .call(
            Request::builder()
                .method("POST")
                .uri("/api/users/signup")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "username": "brand-new-user",
                        "nickname": "brand-new-nick",
                        "password": "one-password-123",
                        "confirmPassword": "other-password-123",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["code"], "DIFFERENT_PASSWORD");

    ctx.cleanup().await.unwrap();
}

/// Wrong password fails with NOT_MATCHED_PASSWORD and issues no tokens
#[tokio::test]
#[ignore] // Requires running Postgres and Redis
async fn test_login_wrong_password() {
    let mut ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .call(
            Request::builder()
                .method("POST")
                .uri("/api/users/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "username": ctx.username,
                        "password": "definitely-wrong",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(jwt::ACCESS_TOKEN_HEADER).is_none());
    assert!(response.headers().get(jwt::REFRESH_TOKEN_HEADER).is_none());

    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["code"], "NOT_MATCHED_PASSWORD");

    ctx.cleanup().await.unwrap();
}

/// Login issues a distinct token pair; logout revokes the access token for
/// the rest of its lifetime and removes the refresh token
#[tokio::test]
#[ignore] // Requires running Postgres and Redis
async fn test_login_logout_lifecycle() {
    let mut ctx = TestContext::new().await.unwrap();

    let (access, refresh) = ctx.login().await.unwrap();
    assert!(access.starts_with(jwt::BEARER_PREFIX));
    assert!(refresh.starts_with(jwt::BEARER_PREFIX));
    assert_ne!(access, refresh);

    // Guarded endpoint accepts the fresh token
    let response = ctx
        .app
        .call(common::authed_request("GET", "/api/users", &access, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Logout with both tokens
    let response = ctx
        .app
        .call(
            Request::builder()
                .method("POST")
                .uri("/api/users/logout")
                .header(jwt::ACCESS_TOKEN_HEADER, &access)
                .header(jwt::REFRESH_TOKEN_HEADER, &refresh)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The blacklisted access token is rejected everywhere now
    let response = ctx
        .app
        .call(common::authed_request("GET", "/api/users", &access, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["code"], "INVALID_ACCESS_TOKEN");

    // Logging out again with the identical token pair succeeds: the refresh
    // deletion is a no-op and the blacklist entry is simply rewritten
    let response = ctx
        .app
        .call(
            Request::builder()
                .method("POST")
                .uri("/api/users/logout")
                .header(jwt::ACCESS_TOKEN_HEADER, &access)
                .header(jwt::REFRESH_TOKEN_HEADER, &refresh)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    ctx.cleanup().await.unwrap();
}

/// Missing header is LOGIN_REQUIRED; garbage tokens are INVALID_ACCESS_TOKEN
#[tokio::test]
#[ignore] // Requires running Postgres and Redis
async fn test_guard_rejects_missing_and_garbage_tokens() {
    let mut ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .call(
            Request::builder()
                .method("GET")
                .uri("/api/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["code"], "LOGIN_REQUIRED");

    let response = ctx
        .app
        .call(common::authed_request(
            "GET",
            "/api/users",
            "Bearer not-a-real-token",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["code"], "INVALID_ACCESS_TOKEN");

    ctx.cleanup().await.unwrap();
}

/// Create, read, comment on, and delete a board post
#[tokio::test]
#[ignore] // Requires running Postgres and Redis
async fn test_board_and_comment_flow() {
    let mut ctx = TestContext::new().await.unwrap();
    let (access, _) = ctx.login().await.unwrap();

    // Create a board post
    let response = ctx
        .app
        .call(common::authed_request(
            "POST",
            "/api/boards",
            &access,
            Some(json!({"title": "First post", "content": "Hello, Agora"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await.unwrap();
    let board_id = body["data"]["id"].as_str().unwrap().to_string();

    // Read it back
    let response = ctx
        .app
        .call(common::authed_request(
            "GET",
            &format!("/api/boards/{}", board_id),
            &access,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["data"]["title"], "First post");

    // Comment on it
    let response = ctx
        .app
        .call(common::authed_request(
            "POST",
            &format!("/api/boards/{}/comments", board_id),
            &access,
            Some(json!({"content": "First comment"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .call(common::authed_request(
            "GET",
            &format!("/api/boards/{}/comments", board_id),
            &access,
            None,
        ))
        .await
        .unwrap();
    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Delete the post; comments go with it
    let response = ctx
        .app
        .call(common::authed_request(
            "DELETE",
            &format!("/api/boards/{}", board_id),
            &access,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .call(common::authed_request(
            "GET",
            &format!("/api/boards/{}", board_id),
            &access,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["code"], "NOT_FOUND_BOARD");

    ctx.cleanup().await.unwrap();
}

/// Report listings are admin-only; a regular user gets ACCESS_DENY
#[tokio::test]
#[ignore] // Requires running Postgres and Redis
async fn test_report_listing_requires_admin() {
    let mut ctx = TestContext::new().await.unwrap();
    let (access, _) = ctx.login().await.unwrap();

    let response = ctx
        .app
        .call(common::authed_request(
            "GET",
            "/api/reports/boards",
            &access,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["code"], "ACCESS_DENY");

    ctx.cleanup().await.unwrap();
}

/// Availability checks report taken names as unavailable
#[tokio::test]
#[ignore] // Requires running Postgres and Redis
async fn test_availability_checks() {
    let mut ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .call(
            Request::builder()
                .method("POST")
                .uri("/api/users/username")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"username": ctx.username}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["data"]["available"], false);

    let response = ctx
        .app
        .call(
            Request::builder()
                .method("POST")
                .uri("/api/users/username")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"username": "completely-unused-name"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let body = common::body_json(response).await.unwrap();
    assert_eq!(body["data"]["available"], true);

    ctx.cleanup().await.unwrap();
}
