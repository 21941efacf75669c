//! Keyword categorization rule model and DTOs.

use jacms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `category_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryRule {
    pub id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub keywords: Vec<String>,
    pub match_field: String,
    pub weight: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRule {
    pub category_id: DbId,
    pub name: String,
    pub keywords: Vec<String>,
    pub match_field: Option<String>,
    pub weight: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryRule {
    pub category_id: Option<DbId>,
    pub name: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub match_field: Option<String>,
    pub weight: Option<i32>,
    pub is_active: Option<bool>,
}
