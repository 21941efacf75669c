//! Notifications, system health metrics and security events.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth, user_with_token};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_notification_lifecycle(pool: PgPool) {
    let (_admin, admin_token) = user_with_token(&pool, "admin", "admin").await;
    let (user, token) = user_with_token(&pool, "reader", "author").await;
    let app = common::build_test_app(pool);

    for title in ["First", "Second"] {
        let response = post_json_auth(
            app.clone(),
            "/api/notifications",
            &admin_token,
            json!({ "user_id": user.id, "kind": "success", "title": title, "message": "hi" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(get_auth(app.clone(), "/api/notifications/unread-count", &token).await).await;
    assert_eq!(json["data"]["unread"], 2);

    let list = body_json(get_auth(app.clone(), "/api/notifications", &token).await).await;
    assert_eq!(list["data"]["total"], 2);
    let first_id = list["data"]["items"][0]["id"].clone();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/notifications/{first_id}/read"),
        &token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_read"], true);

    let response = put_json_auth(app.clone(), "/api/notifications/read-all", &token, json!({})).await;
    assert_eq!(body_json(response).await["data"]["affected"], 1);

    let unread = body_json(
        get_auth(app, "/api/notifications?unread_only=true", &token).await,
    )
    .await;
    assert_eq!(unread["data"]["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_notifications_are_private(pool: PgPool) {
    let (_admin, admin_token) = user_with_token(&pool, "admin", "admin").await;
    let (owner, _owner_token) = user_with_token(&pool, "owner", "author").await;
    let (_other, other_token) = user_with_token(&pool, "other", "author").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/notifications",
        &admin_token,
        json!({ "user_id": owner.id, "title": "Yours", "message": "only yours" }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].clone();

    let response = put_json_auth(
        app,
        &format!("/api/notifications/{id}/read"),
        &other_token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_notification_create_is_admin_only_and_validated(pool: PgPool) {
    let (admin, admin_token) = user_with_token(&pool, "admin", "admin").await;
    let (_editor, editor_token) = user_with_token(&pool, "editor", "editor").await;
    let app = common::build_test_app(pool);

    let body = json!({ "user_id": admin.id, "title": "x", "message": "y" });
    let response = post_json_auth(app.clone(), "/api/notifications", &editor_token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app,
        "/api/notifications",
        &admin_token,
        json!({ "user_id": admin.id, "kind": "shout", "title": "x", "message": "y" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_overview_uses_worst_status(pool: PgPool) {
    let (_admin, admin_token) = user_with_token(&pool, "admin", "admin").await;
    let (_user, token) = user_with_token(&pool, "reader", "author").await;
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app.clone(), "/api/system/health", &token).await).await;
    assert_eq!(json["data"]["overall_status"], "healthy");

    for (metric, value, status) in [("cpu", 35.0, "healthy"), ("disk", 97.5, "critical")] {
        let response = post_json_auth(
            app.clone(),
            "/api/system/health",
            &admin_token,
            json!({ "metric": metric, "value": value, "unit": "%", "status": status }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(get_auth(app.clone(), "/api/system/health", &token).await).await;
    assert_eq!(json["data"]["overall_status"], "critical");
    assert_eq!(json["data"]["metrics"].as_array().unwrap().len(), 2);

    let history = body_json(get_auth(app.clone(), "/api/system/health/disk", &token).await).await;
    assert_eq!(history["data"][0]["value"], 97.5);

    let response = post_json_auth(
        app,
        "/api/system/health",
        &token,
        json!({ "metric": "cpu", "value": 1.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_security_events_admin_only(pool: PgPool) {
    let (_admin, admin_token) = user_with_token(&pool, "admin", "admin").await;
    let (_user, token) = user_with_token(&pool, "reader", "editor").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/system/security-events", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        "/api/system/security-events",
        &admin_token,
        json!({ "event_type": "permission_change", "severity": "high", "description": "Role changed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(
        app.clone(),
        "/api/system/security-events",
        &admin_token,
        json!({ "event_type": "x", "severity": "extreme", "description": "bad" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(
        get_auth(app, "/api/system/security-events?severity=high", &admin_token).await,
    )
    .await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["event_type"], "permission_change");
}
