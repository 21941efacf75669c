//! Menus over HTTP, including item reconciliation on update.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth, user_with_token};
use serde_json::{json, Value};
use sqlx::PgPool;

fn three_items() -> Value {
    json!([
        { "label": "Home", "url": "/" },
        { "label": "Blog", "url": "/blog", "children": [
            { "label": "Rust", "url": "/blog/rust" }
        ]},
    ])
}

async fn create_menu(app: axum::Router, token: &str) -> Value {
    let response = post_json_auth(
        app,
        "/api/menus",
        token,
        json!({ "name": "Main", "location": "header", "items": three_items() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_returns_item_tree(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "editor", "editor").await;
    let app = common::build_test_app(pool);

    let menu = create_menu(app, &token).await;

    assert_eq!(menu["location"], "header");
    let items = menu["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["label"], "Home");
    assert_eq!(items[1]["children"][0]["label"], "Rust");
    assert_eq!(items[1]["sort_order"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_items_replaces_set_and_keeps_ids(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "editor", "editor").await;
    let app = common::build_test_app(pool);

    let menu = create_menu(app.clone(), &token).await;
    let blog_id = menu["items"][1]["id"].clone();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/menus/{}", menu["id"]),
        &token,
        json!({ "items": [{ "id": blog_id, "label": "Articles", "url": "/blog" }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();

    let items = updated["items"].as_array().unwrap();
    assert_eq!(items.len(), 1, "exactly the supplied items remain");
    assert_eq!(items[0]["id"], blog_id);
    assert_eq!(items[0]["label"], "Articles");
    assert_eq!(items[0]["children"], json!([]));
    assert_eq!(updated["name"], "Main");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_without_items_leaves_them(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "editor", "editor").await;
    let app = common::build_test_app(pool);

    let menu = create_menu(app.clone(), &token).await;

    let response = put_json_auth(
        app,
        &format!("/api/menus/{}", menu["id"]),
        &token,
        json!({ "name": "Primary" }),
    )
    .await;
    let updated = body_json(response).await["data"].clone();

    assert_eq!(updated["name"], "Primary");
    assert_eq!(updated["items"], menu["items"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_item_id_is_rejected(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "editor", "editor").await;
    let app = common::build_test_app(pool);

    let menu = create_menu(app.clone(), &token).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/menus/{}", menu["id"]),
        &token,
        json!({ "items": [{ "id": 999_999, "label": "Ghost", "url": "/ghost" }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unchanged = body_json(get_auth(app, &format!("/api/menus/{}", menu["id"]), &token).await).await;
    assert_eq!(unchanged["data"]["items"], menu["items"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lookup_by_location(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "editor", "editor").await;
    let app = common::build_test_app(pool);

    let menu = create_menu(app.clone(), &token).await;

    let json = body_json(get_auth(app.clone(), "/api/menus/location/header", &token).await).await;
    assert_eq!(json["data"]["id"], menu["id"]);

    let response = get_auth(app, "/api/menus/location/footer", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Menu 'footer' not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_location_is_unique_and_validated(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "editor", "editor").await;
    let app = common::build_test_app(pool);

    create_menu(app.clone(), &token).await;

    let response = post_json_auth(
        app.clone(),
        "/api/menus",
        &token,
        json!({ "name": "Other", "location": "header" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(
        app,
        "/api/menus",
        &token,
        json!({ "name": "Bad", "location": "Side Bar" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_menu(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "editor", "editor").await;
    let app = common::build_test_app(pool);

    let menu = create_menu(app.clone(), &token).await;
    let uri = format!("/api/menus/{}", menu["id"]);

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
