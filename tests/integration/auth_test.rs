//! Authentication API integration tests
//!
//! Tests for register, login, the current-user endpoint and the bearer
//! token middleware.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::assert_api_error;
use crate::common::TestApp;

#[tokio::test]
async fn test_register_returns_token_and_user() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Ada", "email": "Ada@Example.com", "password": "password123" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some_and(|token| !token.is_empty()));
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["name"], "Ada");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new().await;
    app.register("Ada", "ada@example.com").await;

    assert_api_error!(
        app.request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Other", "email": "ada@example.com", "password": "password123" })),
        )
        .await,
        StatusCode::CONFLICT,
        "User already exists"
    );
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;

    assert_api_error!(
        app.request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "ada@example.com", "password": "password123" })),
        )
        .await,
        StatusCode::BAD_REQUEST,
        "name, email and password are required"
    );
    assert_api_error!(
        app.request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Ada", "email": "ada@example.com", "password": "short" })),
        )
        .await,
        StatusCode::BAD_REQUEST,
        "Password must be at least 8 characters"
    );
}

#[tokio::test]
async fn test_login_success_and_failure() {
    let app = TestApp::new().await;
    app.register("Ada", "ada@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    assert_api_error!(
        app.request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
        )
        .await,
        StatusCode::UNAUTHORIZED,
        "Invalid email or password"
    );
    assert_api_error!(
        app.request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "password123" })),
        )
        .await,
        StatusCode::UNAUTHORIZED,
        "Invalid email or password"
    );
}

#[tokio::test]
async fn test_me_requires_valid_token() {
    let app = TestApp::new().await;
    let ada = app.register("Ada", "ada@example.com").await;

    let (status, body) = app.get("/api/auth/me", &ada.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(ada.id));

    assert_api_error!(
        app.request(Method::GET, "/api/auth/me", None, None).await,
        StatusCode::UNAUTHORIZED,
        "Missing token"
    );
    assert_api_error!(
        app.get("/api/auth/me", "not-a-token").await,
        StatusCode::UNAUTHORIZED,
        "Invalid token"
    );
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new().await;
    assert_api_error!(
        app.request(Method::GET, "/api/nope", None, None).await,
        StatusCode::NOT_FOUND,
        "Route not found"
    );
}
