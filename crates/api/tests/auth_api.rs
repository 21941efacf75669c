//! Login, token refresh, logout and account lockout.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let user = create_user(&pool, "loginuser", "editor").await;
    let app = common::build_test_app(pool);

    let response = login(app, "loginuser", TEST_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let data = &json["data"];
    assert!(data["access_token"].is_string());
    assert!(data["refresh_token"].is_string());
    assert_eq!(data["expires_in"], 15 * 60);
    assert_eq!(data["user"]["id"], user.id);
    assert_eq!(data["user"]["role"], "editor");
    assert!(data["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_token_authenticates(pool: PgPool) {
    create_user(&pool, "tokenuser", "author").await;
    let app = common::build_test_app(pool);

    let json = body_json(login(app.clone(), "tokenuser", TEST_PASSWORD).await).await;
    let token = json["data"]["access_token"].as_str().unwrap().to_string();

    let response = get_auth(app, "/api/dashboard/stats", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_wrong_password_records_security_event(pool: PgPool) {
    create_user(&pool, "wrongpw", "author").await;
    let app = common::build_test_app(pool.clone());

    let response = login(app, "wrongpw", "incorrect_password").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid username or password");

    let events: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM security_events WHERE event_type = 'login_failed'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(events, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_user_gets_same_error(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = login(app, "nobody", "whatever").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid username or password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_account_locks_after_repeated_failures(pool: PgPool) {
    create_user(&pool, "lockme", "author").await;
    let app = common::build_test_app(pool);

    for _ in 0..5 {
        let response = login(app.clone(), "lockme", "bad").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = login(app, "lockme", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    create_user(&pool, "refresher", "author").await;
    let app = common::build_test_app(pool);

    let json = body_json(login(app.clone(), "refresher", TEST_PASSWORD).await).await;
    let refresh_token = json["data"]["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["data"]["refresh_token"], json["data"]["refresh_token"]);

    // The old token was revoked by the rotation.
    let response = post_json(
        app,
        "/api/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    create_user(&pool, "leaver", "author").await;
    let app = common::build_test_app(pool);

    let json = body_json(login(app.clone(), "leaver", TEST_PASSWORD).await).await;
    let access = json["data"]["access_token"].as_str().unwrap().to_string();
    let refresh_token = json["data"]["refresh_token"].as_str().unwrap().to_string();

    let response = post_json_auth(app.clone(), "/api/auth/logout", &access, json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/auth/logout", json!({})).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
