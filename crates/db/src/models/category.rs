//! Category entity model and DTOs.

use jacms_core::bulk::BulkMode;
use jacms_core::hierarchy::HierarchyMove;
use jacms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<DbId>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A category with computed post and child counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithCounts {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<DbId>,
    pub sort_order: i32,
    pub is_active: bool,
    pub posts_count: i64,
    pub subcategories_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<DbId>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// DTO for updating a category. All fields are optional.
///
/// `parent_id` uses a double option: absent keeps the parent, `null`
/// moves the category to the top level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<DbId>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

fn double_option<'de, D>(de: D) -> Result<Option<Option<DbId>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<DbId>::deserialize(de).map(Some)
}

/// Query parameters for `GET /categories`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryListParams {
    pub search: Option<String>,
    pub parent_id: Option<DbId>,
    /// Only top-level categories when `true`.
    #[serde(default)]
    pub root_only: bool,
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /categories/bulk-delete`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeleteCategories {
    pub ids: Vec<DbId>,
    #[serde(default)]
    pub mode: BulkMode,
}

/// Request body for `POST /categories/bulk-toggle`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkToggleCategories {
    pub ids: Vec<DbId>,
    pub is_active: bool,
    #[serde(default)]
    pub mode: BulkMode,
}

/// Request body for `PUT /categories/reorder`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderCategories {
    pub moves: Vec<HierarchyMove>,
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryImportReport {
    pub created: usize,
    pub updated: usize,
    /// Rows whose `parent_slug` matched no category; imported at top level.
    pub unresolved_parents: Vec<String>,
    pub errors: Vec<jacms_core::category_csv::CsvRowError>,
}
