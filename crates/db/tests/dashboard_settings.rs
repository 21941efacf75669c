//! Integration tests for per-user dashboard settings persistence.

use jacms_core::dashboard_settings::{default_appearance, SettingsDefaults};
use jacms_db::models::dashboard_settings::SaveDashboardSettings;
use jacms_db::models::user::CreateUser;
use jacms_db::repositories::{DashboardSettingsRepo, UserRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            display_name: None,
            role_id: 3,
        },
    )
    .await
    .unwrap()
    .id
}

async fn row_count(pool: &PgPool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM dashboard_settings WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_or_create_inserts_defaults_once(pool: PgPool) {
    let user_id = create_user(&pool, "alice").await;

    assert!(DashboardSettingsRepo::get_settings(&pool, user_id)
        .await
        .unwrap()
        .is_none());

    let first = DashboardSettingsRepo::get_or_create_settings(&pool, user_id)
        .await
        .unwrap();
    let second = DashboardSettingsRepo::get_or_create_settings(&pool, user_id)
        .await
        .unwrap();

    let defaults = SettingsDefaults::default();
    assert_eq!(first.widgets, defaults.widgets);
    assert_eq!(first.grid_layout, defaults.grid_layout);
    assert_eq!(first, second);
    assert_eq!(row_count(&pool, user_id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_save_fills_defaults_then_keeps_stored_sections(pool: PgPool) {
    let user_id = create_user(&pool, "bob").await;
    let layout = json!({ "columns": 2, "compact": true });

    let created = DashboardSettingsRepo::create_or_update_settings(
        &pool,
        user_id,
        &SaveDashboardSettings {
            layout: Some(layout.clone()),
            ..SaveDashboardSettings::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(created.layout, layout);
    assert_eq!(created.appearance, default_appearance());

    let appearance = json!({ "theme": "dark" });
    let updated = DashboardSettingsRepo::create_or_update_settings(
        &pool,
        user_id,
        &SaveDashboardSettings {
            appearance: Some(appearance.clone()),
            ..SaveDashboardSettings::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.layout, layout, "unsent section must be preserved");
    assert_eq!(updated.appearance, appearance);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn saving_same_payload_twice_is_idempotent(pool: PgPool) {
    let user_id = create_user(&pool, "carol").await;
    let payload = SaveDashboardSettings {
        widgets: Some(json!([{ "id": "recent-posts", "enabled": true }])),
        data: Some(json!({ "date_range": "30d" })),
        ..SaveDashboardSettings::default()
    };

    let a = DashboardSettingsRepo::create_or_update_settings(&pool, user_id, &payload)
        .await
        .unwrap();
    let b = DashboardSettingsRepo::create_or_update_settings(&pool, user_id, &payload)
        .await
        .unwrap();

    assert_eq!(a.id, b.id);
    assert_eq!(a.widgets, b.widgets);
    assert_eq!(a.data, b.data);
    assert_eq!(row_count(&pool, user_id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_restores_every_section(pool: PgPool) {
    let user_id = create_user(&pool, "dave").await;
    DashboardSettingsRepo::create_or_update_settings(
        &pool,
        user_id,
        &SaveDashboardSettings {
            widgets: Some(json!([])),
            layout: Some(json!({})),
            appearance: Some(json!({})),
            data: Some(json!({})),
            grid_layout: Some(json!([])),
        },
    )
    .await
    .unwrap();

    let reset = DashboardSettingsRepo::reset_settings(&pool, user_id)
        .await
        .unwrap();
    let defaults = SettingsDefaults::default();
    assert_eq!(reset.widgets, defaults.widgets);
    assert_eq!(reset.layout, defaults.layout);
    assert_eq!(reset.appearance, defaults.appearance);
    assert_eq!(reset.data, defaults.data);
    assert_eq!(reset.grid_layout, defaults.grid_layout);
    assert_eq!(row_count(&pool, user_id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn settings_are_removed_with_user(pool: PgPool) {
    let user_id = create_user(&pool, "erin").await;
    DashboardSettingsRepo::get_or_create_settings(&pool, user_id)
        .await
        .unwrap();

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(row_count(&pool, user_id).await, 0);
}
