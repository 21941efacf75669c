//! Dashboard settings, stats and widget catalog.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth, user_with_token};
use jacms_core::dashboard_settings::{default_appearance, default_layout, default_widgets};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_settings_created_on_first_access(pool: PgPool) {
    let (user, token) = user_with_token(&pool, "dash", "author").await;
    let app = common::build_test_app(pool);

    let first = body_json(get_auth(app.clone(), "/api/dashboard/settings", &token).await).await;
    let second = body_json(get_auth(app, "/api/dashboard/settings", &token).await).await;

    assert_eq!(first["data"]["user_id"], user.id);
    assert_eq!(first["data"]["widgets"], default_widgets());
    assert_eq!(first["data"]["layout"], default_layout());
    assert_eq!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(first["data"]["created_at"], second["data"]["created_at"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_settings_is_idempotent(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "dash", "author").await;
    let app = common::build_test_app(pool.clone());
    let body = json!({ "layout": { "columns": 2 }, "appearance": { "theme": "dark" } });

    let first = put_json_auth(app.clone(), "/api/dashboard/settings", &token, body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    let second = body_json(put_json_auth(app, "/api/dashboard/settings", &token, body).await).await;

    for key in ["id", "widgets", "layout", "appearance", "data", "grid_layout"] {
        assert_eq!(first["data"][key], second["data"][key], "{key} should be stable");
    }
    assert_eq!(second["data"]["layout"], json!({ "columns": 2 }));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dashboard_settings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_save_keeps_other_sections(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "dash", "author").await;
    let app = common::build_test_app(pool);

    put_json_auth(
        app.clone(),
        "/api/dashboard/settings",
        &token,
        json!({ "appearance": { "theme": "dark" } }),
    )
    .await;
    let json = body_json(
        put_json_auth(
            app,
            "/api/dashboard/settings",
            &token,
            json!({ "layout": { "columns": 1 } }),
        )
        .await,
    )
    .await;

    assert_eq!(json["data"]["appearance"], json!({ "theme": "dark" }));
    assert_eq!(json["data"]["layout"], json!({ "columns": 1 }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_restores_defaults(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "dash", "author").await;
    let app = common::build_test_app(pool);

    put_json_auth(
        app.clone(),
        "/api/dashboard/settings",
        &token,
        json!({ "appearance": { "theme": "dark" } }),
    )
    .await;

    let response = post_json_auth(app.clone(), "/api/dashboard/settings/reset", &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["appearance"], default_appearance());

    let response = delete_auth(app, "/api/dashboard/settings", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_settings_are_per_user(pool: PgPool) {
    let (_a, token_a) = user_with_token(&pool, "alice", "author").await;
    let (_b, token_b) = user_with_token(&pool, "bob", "author").await;
    let app = common::build_test_app(pool);

    put_json_auth(
        app.clone(),
        "/api/dashboard/settings",
        &token_a,
        json!({ "appearance": { "theme": "dark" } }),
    )
    .await;
    let json = body_json(get_auth(app, "/api/dashboard/settings", &token_b).await).await;

    assert_eq!(json["data"]["appearance"], default_appearance());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_and_widgets(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "dash", "author").await;
    let app = common::build_test_app(pool);

    let stats = body_json(get_auth(app.clone(), "/api/dashboard/stats", &token).await).await;
    assert_eq!(stats["data"]["total_users"], 1);
    assert_eq!(stats["data"]["total_posts"], 0);

    let widgets = body_json(get_auth(app.clone(), "/api/dashboard/widgets", &token).await).await;
    assert!(!widgets["data"].as_array().unwrap().is_empty());

    let recent = body_json(get_auth(app, "/api/dashboard/recent-posts", &token).await).await;
    assert_eq!(recent["data"], json!([]));
}
