//! Menu and menu item models and DTOs.

use jacms_core::hierarchy::TreeNode;
use jacms_core::menu::MenuItemInput;
use jacms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `menus` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Menu {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `menu_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MenuItem {
    pub id: DbId,
    pub menu_id: DbId,
    pub parent_id: Option<DbId>,
    pub label: String,
    pub url: String,
    pub target: String,
    pub icon: Option<String>,
    pub css_class: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A menu with its items nested by parent.
#[derive(Debug, Clone, Serialize)]
pub struct MenuWithItems {
    #[serde(flatten)]
    pub menu: Menu,
    pub items: Vec<TreeNode<MenuItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMenu {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub items: Vec<MenuItemInput>,
}

/// DTO for updating a menu. When `items` is present the stored items are
/// reconciled against it; when absent they are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMenu {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub items: Option<Vec<MenuItemInput>>,
}
