//! Category template model and DTOs.

use jacms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `category_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryTemplate {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// JSON array of [`TemplateCategory`] entries.
    pub categories: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One category definition inside a template.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateCategory {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryTemplate {
    pub name: String,
    pub description: Option<String>,
    pub categories: Vec<TemplateCategory>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<TemplateCategory>>,
}

/// Result of applying a template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyTemplateReport {
    pub created: Vec<DbId>,
    /// Slugs that already existed and were left untouched.
    pub skipped: Vec<String>,
}
