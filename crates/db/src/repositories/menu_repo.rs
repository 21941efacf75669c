//! Repository for the `menus` and `menu_items` tables.

use jacms_core::hierarchy::build_forest;
use jacms_core::menu::MenuSyncPlan;
use jacms_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::menu::{CreateMenu, Menu, MenuItem, MenuWithItems, UpdateMenu};

/// Column list for `menus` queries.
const COLUMNS: &str = "id, name, location, description, is_active, created_at, updated_at";

/// Column list for `menu_items` queries.
const ITEM_COLUMNS: &str = "id, menu_id, parent_id, label, url, target, icon, css_class, \
    sort_order, is_active, created_at, updated_at";

/// Outcome of [`MenuRepo::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuUpdate {
    Updated,
    NotFound,
    /// The stored items no longer match the ids the plan was built from.
    ItemsChanged,
}

/// Provides CRUD for menus and reconciles their item trees.
pub struct MenuRepo;

impl MenuRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Menu>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menus ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, Menu>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MenuWithItems>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menus WHERE id = $1");
        let menu = sqlx::query_as::<_, Menu>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match menu {
            Some(menu) => Ok(Some(Self::with_items(pool, menu).await?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_location(
        pool: &PgPool,
        location: &str,
    ) -> Result<Option<MenuWithItems>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menus WHERE location = $1");
        let menu = sqlx::query_as::<_, Menu>(&query)
            .bind(location)
            .fetch_optional(pool)
            .await?;
        match menu {
            Some(menu) => Ok(Some(Self::with_items(pool, menu).await?)),
            None => Ok(None),
        }
    }

    async fn with_items(pool: &PgPool, menu: Menu) -> Result<MenuWithItems, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM menu_items \
             WHERE menu_id = $1 \
             ORDER BY sort_order ASC, id ASC"
        );
        let items = sqlx::query_as::<_, MenuItem>(&query)
            .bind(menu.id)
            .fetch_all(pool)
            .await?;
        Ok(MenuWithItems {
            menu,
            items: build_forest(items, |i| i.id, |i| i.parent_id),
        })
    }

    /// Ids of all items currently stored for `menu_id`.
    pub async fn item_ids(pool: &PgPool, menu_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM menu_items WHERE menu_id = $1 ORDER BY id")
            .bind(menu_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a menu and its planned items in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMenu,
        plan: &MenuSyncPlan,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO menus (name, location, description, is_active) \
             VALUES ($1, $2, $3, COALESCE($4, true)) \
             RETURNING id",
        )
        .bind(input.name.trim())
        .bind(&input.location)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_one(&mut *tx)
        .await?;

        apply_plan(&mut tx, id, plan).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Update menu fields and, when a plan is given, reconcile its items.
    ///
    /// The whole update is one transaction. Updating the menu row locks it,
    /// and the stored item ids are compared with [`MenuSyncPlan::base_ids`]
    /// under that lock; a mismatch rolls back with
    /// [`MenuUpdate::ItemsChanged`].
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMenu,
        plan: Option<&MenuSyncPlan>,
    ) -> Result<MenuUpdate, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE menus SET \
                name = COALESCE($2, name), \
                location = COALESCE($3, location), \
                description = COALESCE($4, description), \
                is_active = COALESCE($5, is_active) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(&input.location)
        .bind(&input.description)
        .bind(input.is_active)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(MenuUpdate::NotFound);
        }

        if let Some(plan) = plan {
            let stored: Vec<DbId> =
                sqlx::query_scalar("SELECT id FROM menu_items WHERE menu_id = $1 ORDER BY id")
                    .bind(id)
                    .fetch_all(&mut *tx)
                    .await?;
            if stored != plan.base_ids() {
                tx.rollback().await?;
                return Ok(MenuUpdate::ItemsChanged);
            }
            apply_plan(&mut tx, id, plan).await?;
        }
        tx.commit().await?;
        Ok(MenuUpdate::Updated)
    }

    /// Delete a menu; its items cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Write `plan` for `menu_id`: update matched rows, insert new ones, then
/// delete rows absent from the payload.
async fn apply_plan(
    tx: &mut Transaction<'_, Postgres>,
    menu_id: DbId,
    plan: &MenuSyncPlan,
) -> Result<(), sqlx::Error> {
    // Resolved row id of each planned item, by plan index.
    let mut ids: Vec<DbId> = Vec::with_capacity(plan.items.len());

    for item in &plan.items {
        let parent_id = item.parent_index.map(|i| ids[i]);

        let id = match item.existing_id {
            Some(existing) => {
                let result = sqlx::query(
                    "UPDATE menu_items SET \
                        parent_id = $3, label = $4, url = $5, target = $6, icon = $7, \
                        css_class = $8, sort_order = $9, is_active = $10 \
                     WHERE id = $1 AND menu_id = $2",
                )
                .bind(existing)
                .bind(menu_id)
                .bind(parent_id)
                .bind(&item.label)
                .bind(&item.url)
                .bind(&item.target)
                .bind(&item.icon)
                .bind(&item.css_class)
                .bind(item.sort_order)
                .bind(item.is_active)
                .execute(&mut **tx)
                .await?;
                if result.rows_affected() == 0 {
                    return Err(sqlx::Error::RowNotFound);
                }
                existing
            }
            None => {
                sqlx::query_scalar(
                    "INSERT INTO menu_items \
                        (menu_id, parent_id, label, url, target, icon, css_class, \
                         sort_order, is_active) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
                     RETURNING id",
                )
                .bind(menu_id)
                .bind(parent_id)
                .bind(&item.label)
                .bind(&item.url)
                .bind(&item.target)
                .bind(&item.icon)
                .bind(&item.css_class)
                .bind(item.sort_order)
                .bind(item.is_active)
                .fetch_one(&mut **tx)
                .await?
            }
        };
        ids.push(id);
    }

    if !plan.delete_ids.is_empty() {
        sqlx::query("DELETE FROM menu_items WHERE menu_id = $1 AND id = ANY($2)")
            .bind(menu_id)
            .bind(&plan.delete_ids)
            .execute(&mut **tx)
            .await?;
    }

    tracing::debug!(
        menu_id,
        updated = plan.update_count(),
        inserted = plan.insert_count(),
        deleted = plan.delete_ids.len(),
        "Menu items reconciled",
    );
    Ok(())
}
