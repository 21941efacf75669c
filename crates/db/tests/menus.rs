//! Integration tests for menu item reconciliation.

use jacms_core::menu::{plan_item_sync, MenuItemInput};
use jacms_db::models::menu::{CreateMenu, UpdateMenu};
use jacms_db::repositories::{MenuRepo, MenuUpdate};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn item(id: Option<i64>, label: &str, children: Vec<MenuItemInput>) -> MenuItemInput {
    MenuItemInput {
        id,
        label: label.to_string(),
        url: format!("/{}", label.to_lowercase()),
        target: None,
        icon: None,
        css_class: None,
        is_active: None,
        children,
    }
}

async fn create_menu(pool: &PgPool, location: &str, items: Vec<MenuItemInput>) -> i64 {
    let plan = plan_item_sync(&[], &items).unwrap();
    let input = CreateMenu {
        name: format!("{location} menu"),
        location: location.to_string(),
        description: None,
        is_active: None,
        items,
    };
    MenuRepo::create(pool, &input, &plan).await.unwrap()
}

async fn sync_items(pool: &PgPool, menu_id: i64, items: Vec<MenuItemInput>) {
    let existing = MenuRepo::item_ids(pool, menu_id).await.unwrap();
    let plan = plan_item_sync(&existing, &items).unwrap();
    let input = UpdateMenu {
        items: Some(items),
        ..UpdateMenu::default()
    };
    assert_eq!(
        MenuRepo::update(pool, menu_id, &input, Some(&plan)).await.unwrap(),
        MenuUpdate::Updated
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_builds_nested_tree(pool: PgPool) {
    let id = create_menu(
        &pool,
        "header",
        vec![
            item(None, "Home", vec![]),
            item(None, "Blog", vec![item(None, "Archive", vec![])]),
        ],
    )
    .await;

    let menu = MenuRepo::find_by_location(&pool, "header").await.unwrap().unwrap();
    assert_eq!(menu.menu.id, id);
    assert_eq!(menu.items.len(), 2);
    assert_eq!(menu.items[0].item.label, "Home");
    assert_eq!(menu.items[1].children.len(), 1);
    assert_eq!(menu.items[1].children[0].item.label, "Archive");
    assert_eq!(menu.items[1].children[0].item.target, "_self");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_with_fewer_items_removes_the_rest(pool: PgPool) {
    let menu_id = create_menu(
        &pool,
        "footer",
        vec![
            item(None, "One", vec![]),
            item(None, "Two", vec![]),
            item(None, "Three", vec![]),
        ],
    )
    .await;
    let before = MenuRepo::find_by_id(&pool, menu_id).await.unwrap().unwrap();
    let kept_id = before.items[1].item.id;

    sync_items(&pool, menu_id, vec![item(Some(kept_id), "Second", vec![])]).await;

    let after = MenuRepo::find_by_id(&pool, menu_id).await.unwrap().unwrap();
    assert_eq!(after.items.len(), 1);
    assert_eq!(after.items[0].item.id, kept_id, "surviving item keeps its id");
    assert_eq!(after.items[0].item.label, "Second");
    assert_eq!(MenuRepo::item_ids(&pool, menu_id).await.unwrap(), vec![kept_id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn child_survives_removal_of_its_old_parent(pool: PgPool) {
    let menu_id = create_menu(
        &pool,
        "sidebar",
        vec![item(None, "Parent", vec![item(None, "Child", vec![])])],
    )
    .await;
    let before = MenuRepo::find_by_id(&pool, menu_id).await.unwrap().unwrap();
    let child_id = before.items[0].children[0].item.id;

    sync_items(
        &pool,
        menu_id,
        vec![item(None, "New Parent", vec![item(Some(child_id), "Child", vec![])])],
    )
    .await;

    let after = MenuRepo::find_by_id(&pool, menu_id).await.unwrap().unwrap();
    assert_eq!(after.items.len(), 1);
    assert_eq!(after.items[0].item.label, "New Parent");
    assert_eq!(after.items[0].children[0].item.id, child_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_without_items_leaves_them_alone(pool: PgPool) {
    let menu_id = create_menu(&pool, "mobile", vec![item(None, "Home", vec![])]).await;

    let input = UpdateMenu {
        name: Some("Mobile navigation".into()),
        ..UpdateMenu::default()
    };
    assert_eq!(
        MenuRepo::update(&pool, menu_id, &input, None).await.unwrap(),
        MenuUpdate::Updated
    );

    let menu = MenuRepo::find_by_id(&pool, menu_id).await.unwrap().unwrap();
    assert_eq!(menu.menu.name, "Mobile navigation");
    assert_eq!(menu.items.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_plan_is_refused_without_writing(pool: PgPool) {
    let menu_id = create_menu(
        &pool,
        "sidebar",
        vec![item(None, "Home", vec![]), item(None, "About", vec![])],
    )
    .await;
    let ids = MenuRepo::item_ids(&pool, menu_id).await.unwrap();

    // Planned against both items, but another update removes one first.
    let stale_items = vec![item(Some(ids[0]), "Start", vec![]), item(Some(ids[1]), "Team", vec![])];
    let stale = plan_item_sync(&ids, &stale_items).unwrap();
    sync_items(&pool, menu_id, vec![item(Some(ids[0]), "Home", vec![])]).await;

    let input = UpdateMenu {
        name: Some("Renamed".into()),
        items: Some(stale_items),
        ..UpdateMenu::default()
    };
    let outcome = MenuRepo::update(&pool, menu_id, &input, Some(&stale)).await.unwrap();
    assert_eq!(outcome, MenuUpdate::ItemsChanged);

    let menu = MenuRepo::find_by_id(&pool, menu_id).await.unwrap().unwrap();
    assert_eq!(menu.menu.name, "sidebar menu");
    assert_eq!(menu.items.len(), 1);
    assert_eq!(menu.items[0].item.label, "Home");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_of_missing_menu_reports_not_found(pool: PgPool) {
    let outcome = MenuRepo::update(&pool, 424242, &UpdateMenu::default(), None)
        .await
        .unwrap();
    assert_eq!(outcome, MenuUpdate::NotFound);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_menu_cascades_items(pool: PgPool) {
    let menu_id = create_menu(&pool, "legal", vec![item(None, "Terms", vec![])]).await;
    assert!(MenuRepo::delete(&pool, menu_id).await.unwrap());

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    assert!(!MenuRepo::delete(&pool, menu_id).await.unwrap());
}
