mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("x-request-id"),
        "request id should be propagated to the response"
    );
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_api_requires_bearer_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/posts").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_garbage_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get_auth(app, "/api/dashboard/stats", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}
