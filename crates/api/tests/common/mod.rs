//! Shared helpers for API integration tests.
//!
//! Every test builds the production router via [`build_app_router`] and
//! drives it in-process with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jacms_api::auth::jwt::{generate_access_token, JwtConfig};
use jacms_api::auth::password::hash_password;
use jacms_api::config::ServerConfig;
use jacms_api::router::build_app_router;
use jacms_api::state::AppState;
use jacms_db::models::user::{CreateUser, User};
use jacms_db::repositories::UserRepo;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        site_host: Some("cms.example.com".to_string()),
        jwt: JwtConfig {
            secret: "integration-test-secret-that-is-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and the named role.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    let role_id: i64 = sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
        .bind(role)
        .fetch_one(pool)
        .await
        .expect("role should be seeded");

    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        display_name: None,
        role_id,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Sign an access token directly, skipping the login endpoint.
pub fn token_for(user: &User, role: &str) -> String {
    generate_access_token(user.id, role, &test_config().jwt).expect("token should sign")
}

/// Create a user and return it with a bearer token for the role.
pub async fn user_with_token(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let user = create_user(pool, username, role).await;
    let token = token_for(&user, role);
    (user, token)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST a non-JSON body, e.g. CSV text.
pub async fn post_raw_auth(
    app: Router,
    uri: &str,
    token: &str,
    content_type: &str,
    body: String,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .expect("request should build");
    app.oneshot(request).await.expect("router is infallible")
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}
