//! Tag entity model and DTOs.

use jacms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A tag with the number of posts using it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagWithCount {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub posts_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a tag. The slug is derived from `name` when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// DTO for updating a tag. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTag {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Sort keys accepted by the tag list.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TagSort {
    #[default]
    Name,
    PostsCount,
    CreatedAt,
}

impl TagSort {
    pub fn order_by(self) -> &'static str {
        match self {
            TagSort::Name => "t.name ASC, t.id ASC",
            TagSort::PostsCount => "posts_count DESC, t.name ASC",
            TagSort::CreatedAt => "t.created_at DESC, t.id DESC",
        }
    }
}

/// Query parameters for `GET /tags`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagListParams {
    pub search: Option<String>,
    #[serde(default)]
    pub sort: TagSort,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
