//! Post entity model and DTOs.

use jacms_core::post::PostStatus;
use jacms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `posts` table with its status name resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub status_id: i16,
    /// Status name from `post_statuses`, e.g. `"PUBLISHED"`.
    pub status: String,
    pub author_id: Option<DbId>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub focus_keyword: Option<String>,
    pub published_at: Option<Timestamp>,
    pub scheduled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Post {
    pub fn post_status(&self) -> Option<PostStatus> {
        PostStatus::from_id(self.status_id)
    }
}

/// A post together with its category and tag ids.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithRelations {
    #[serde(flatten)]
    pub post: Post,
    pub category_ids: Vec<DbId>,
    pub tag_ids: Vec<DbId>,
}

/// Compact row for dashboard "recent posts".
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostSummary {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub author_id: Option<DbId>,
    pub published_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

/// DTO for creating a post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    pub featured_image: Option<String>,
    pub status: Option<PostStatus>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub focus_keyword: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    #[serde(default)]
    pub category_ids: Vec<DbId>,
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
}

/// DTO for `PUT` and quick-edit `PATCH`. Absent fields keep stored values;
/// `category_ids`/`tag_ids` replace the association set when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub status: Option<PostStatus>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub focus_keyword: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    pub category_ids: Option<Vec<DbId>>,
    pub tag_ids: Option<Vec<DbId>>,
}

/// Query parameters for `GET /posts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostListParams {
    pub status: Option<PostStatus>,
    pub category_id: Option<DbId>,
    pub tag_id: Option<DbId>,
    pub author_id: Option<DbId>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Fully resolved column values written by create and update.
#[derive(Debug, Clone)]
pub struct PostWrite {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub focus_keyword: Option<String>,
    pub published_at: Option<Timestamp>,
    pub scheduled_at: Option<Timestamp>,
}

impl PostWrite {
    /// Overlay `patch` on the stored `post`. Status-derived fields
    /// (`published_at`) are left for the caller to resolve.
    pub fn merged(post: &Post, patch: &UpdatePost) -> Self {
        Self {
            title: patch.title.clone().unwrap_or_else(|| post.title.clone()),
            slug: patch.slug.clone().unwrap_or_else(|| post.slug.clone()),
            excerpt: patch.excerpt.clone().or_else(|| post.excerpt.clone()),
            content: patch.content.clone().unwrap_or_else(|| post.content.clone()),
            featured_image: patch
                .featured_image
                .clone()
                .or_else(|| post.featured_image.clone()),
            status: patch
                .status
                .or_else(|| post.post_status())
                .unwrap_or(PostStatus::Draft),
            meta_title: patch.meta_title.clone().or_else(|| post.meta_title.clone()),
            meta_description: patch
                .meta_description
                .clone()
                .or_else(|| post.meta_description.clone()),
            focus_keyword: patch
                .focus_keyword
                .clone()
                .or_else(|| post.focus_keyword.clone()),
            published_at: post.published_at,
            scheduled_at: patch.scheduled_at.or(post.scheduled_at),
        }
    }
}
