//! Tags over HTTP.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth, user_with_token};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_update_and_list(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "editor", "editor").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app.clone(), "/api/tags", &token, json!({ "name": "Async Rust" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let tag = body_json(response).await["data"].clone();
    assert_eq!(tag["slug"], "async-rust");

    let response = put_json_auth(
        app.clone(),
        &format!("/api/tags/{}", tag["id"]),
        &token,
        json!({ "color": "#ff0000" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["color"], "#ff0000");

    let json = body_json(get_auth(app, "/api/tags?search=async", &token).await).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["posts_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bulk_delete_counts_missing(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "editor", "editor").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app.clone(), "/api/tags", &token, json!({ "name": "one" })).await;
    let one = body_json(response).await["data"]["id"].clone();

    let response = post_json_auth(
        app.clone(),
        "/api/tags/bulk-delete",
        &token,
        json!({ "ids": [one, 424_242] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await["data"].clone();
    assert_eq!(result["success_count"], 1);
    assert_eq!(result["failure_count"], 1);
    assert_eq!(result["failures"][0]["id"], 424_242);

    let response = get_auth(app, &format!("/api/tags/{one}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_author_cannot_write_tags(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "writer", "author").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/tags", &token, json!({ "name": "x" })).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
