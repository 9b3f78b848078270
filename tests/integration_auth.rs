mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{generate_unique_email, setup_test_app, setup_test_app_with_expired_tokens};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get_me(app: &Router, auth_header: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri("/api/v1/auth/me");
    if let Some(value) = auth_header {
        builder = builder.header("authorization", value);
    }
    let response = app.clone().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register_and_login(app: &Router, email: &str, password: &str) -> Value {
    let (status, _) = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "email": email, "password": password, "name": "Test User" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_success(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/register",
        json!({ "email": email, "password": "password123", "name": "Alice" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], email);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["role"], "user");
    assert!(body["id"].is_i64());
    assert!(body.get("created_at").is_some());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();
    let payload = json!({ "email": email, "password": "password123", "name": "Alice" });

    let (status, _) = post_json(&app, "/api/v1/auth/register", payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(&app, "/api/v1/auth/register", payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "USER_EXISTS");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_short_password_rejected(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/register",
        json!({ "email": generate_unique_email(), "password": "short", "name": "Alice" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_missing_field_rejected(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/register",
        json!({ "email": generate_unique_email(), "password": "password123" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_returns_token_pair(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();

    let body = register_and_login(&app, &email, "password123").await;

    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(body["expires_in"], 900);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_errors_do_not_leak_account_existence(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();
    register_and_login(&app, &email, "password123").await;

    let (wrong_pw_status, wrong_pw_body) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": "not-the-password" }),
    )
    .await;
    let (unknown_status, unknown_body) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "email": "nobody@test.com", "password": "password123" }),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body["code"], "INVALID_CREDENTIALS");
    // Identical error bodies for wrong password and unknown email.
    assert_eq!(wrong_pw_body, unknown_body);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_with_valid_token(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();
    let tokens = register_and_login(&app, &email, "password123").await;

    let header = format!("Bearer {}", tokens["access_token"].as_str().unwrap());
    let (status, body) = get_me(&app, Some(&header)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email);
    assert_eq!(body["name"], "Test User");
    assert_eq!(body["role"], "user");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_without_header_is_generic_unauthorized(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = get_me(&app, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_ne!(body["code"], "TOKEN_EXPIRED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_with_wrong_scheme_is_generic_unauthorized(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = get_me(&app, Some("Basic xyz")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_ne!(body["code"], "TOKEN_EXPIRED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_with_expired_token_reports_token_expired(pool: PgPool) {
    // Log in through a router whose codec issues already-expired access
    // tokens, then present one to the normally-configured router.
    let expired_app = setup_test_app_with_expired_tokens(pool.clone());
    let app = setup_test_app(pool);
    let email = generate_unique_email();
    let tokens = register_and_login(&expired_app, &email, "password123").await;

    let header = format!("Bearer {}", tokens["access_token"].as_str().unwrap());
    let (status, body) = get_me(&app, Some(&header)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_EXPIRED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_after_user_deleted_is_not_found(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();
    let tokens = register_and_login(&app, &email, "password123").await;

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&pool)
        .await
        .unwrap();

    let header = format!("Bearer {}", tokens["access_token"].as_str().unwrap());
    let (status, _) = get_me(&app, Some(&header)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rotates_and_rejects_replay(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();
    let tokens = register_and_login(&app, &email, "password123").await;
    let r1 = tokens["refresh_token"].as_str().unwrap().to_string();

    // First redemption succeeds and yields a different refresh token.
    let (status, body) =
        post_json(&app, "/api/v1/auth/refresh", json!({ "refresh_token": r1 })).await;
    assert_eq!(status, StatusCode::OK);
    let r2 = body["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(r1, r2);
    assert!(!body["access_token"].as_str().unwrap().is_empty());

    // Replaying the redeemed token fails.
    let (status, body) =
        post_json(&app, "/api/v1/auth/refresh", json!({ "refresh_token": r1 })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");

    // The rotation chain continues from the new token.
    let (status, _) =
        post_json(&app, "/api/v1/auth/refresh", json!({ "refresh_token": r2 })).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_with_unknown_token_rejected(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": "0".repeat(64) }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_invalidates_refresh_token_and_is_idempotent(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();
    let tokens = register_and_login(&app, &email, "password123").await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/logout",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("message").is_some());

    // The logged-out token can no longer be redeemed.
    let (status, body) = post_json(
        &app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");

    // Logging out again is not an error.
    let (status, _) = post_json(
        &app,
        "/api/v1/auth/logout",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_all_ends_every_session(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();
    let first = register_and_login(&app, &email, "password123").await;

    // Second login from another client.
    let (status, second) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/logout-all")
        .header(
            "authorization",
            format!("Bearer {}", first["access_token"].as_str().unwrap()),
        )
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for tokens in [&first, &second] {
        let (status, _) = post_json(
            &app,
            "/api/v1/auth/refresh",
            json!({ "refresh_token": tokens["refresh_token"] }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_full_auth_flow(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/register",
        json!({ "email": "alice@example.com", "password": "password123", "name": "Alice" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "alice@example.com");

    let (status, tokens) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "email": "alice@example.com", "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!tokens["access_token"].as_str().unwrap().is_empty());
    assert!(!tokens["refresh_token"].as_str().unwrap().is_empty());

    let header = format!("Bearer {}", tokens["access_token"].as_str().unwrap());
    let (status, me) = get_me(&app, Some(&header)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "alice@example.com");
    assert_eq!(me["name"], "Alice");
    assert_eq!(me["role"], "user");

    let original_refresh = tokens["refresh_token"].as_str().unwrap().to_string();
    let (status, rotated) = post_json(
        &app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": original_refresh }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(rotated["refresh_token"], tokens["refresh_token"]);

    // Reusing the original refresh token after rotation fails.
    let (status, body) = post_json(
        &app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": original_refresh }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_endpoints(pool: PgPool) {
    let app = setup_test_app(pool);

    for uri in ["/health", "/ready"] {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
