//! Repository for the `tags` table.

use jacms_core::bulk::{dedup_ids, BulkResult};
use jacms_core::pagination::{clamp_limit, clamp_offset, like_pattern, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use jacms_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::Page;
use crate::models::tag::{CreateTag, Tag, TagListParams, TagWithCount, UpdateTag};

/// Column list for `tags` queries.
const COLUMNS: &str = "id, name, slug, description, color, created_at, updated_at";

/// Column list for queries that include the post count (table alias `t`).
const COUNT_COLUMNS: &str = "t.id, t.name, t.slug, t.description, t.color, \
    (SELECT COUNT(*) FROM post_tags pt WHERE pt.tag_id = t.id) AS posts_count, \
    t.created_at, t.updated_at";

/// Shared search filter; `$1` is an optional `ILIKE` pattern.
const SEARCH_FILTER: &str = "($1::text IS NULL OR t.name ILIKE $1 OR t.slug ILIKE $1)";

/// Provides CRUD and bulk operations for tags.
pub struct TagRepo;

impl TagRepo {
    /// List tags with post counts, filtered, sorted and paginated.
    pub async fn list(
        pool: &PgPool,
        params: &TagListParams,
    ) -> Result<Page<TagWithCount>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);
        let pattern = params
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(like_pattern);

        let query = format!(
            "SELECT {COUNT_COLUMNS} FROM tags t \
             WHERE {SEARCH_FILTER} \
             ORDER BY {} \
             LIMIT $2 OFFSET $3",
            params.sort.order_by()
        );
        let items = sqlx::query_as::<_, TagWithCount>(&query)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM tags t WHERE {SEARCH_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&pattern)
            .fetch_one(pool)
            .await?;

        Ok(Page {
            items,
            total,
            limit,
            offset,
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TagWithCount>, sqlx::Error> {
        let query = format!("SELECT {COUNT_COLUMNS} FROM tags t WHERE t.id = $1");
        sqlx::query_as::<_, TagWithCount>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<TagWithCount>, sqlx::Error> {
        let query = format!("SELECT {COUNT_COLUMNS} FROM tags t WHERE t.slug = $1");
        sqlx::query_as::<_, TagWithCount>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Insert a tag with an already resolved `slug`.
    pub async fn create(pool: &PgPool, input: &CreateTag, slug: &str) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name, slug, description, color) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(input.name.trim())
            .bind(slug)
            .bind(&input.description)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    /// Update a tag. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTag,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "UPDATE tags SET \
                name = COALESCE($2, name), \
                slug = COALESCE($3, slug), \
                description = COALESCE($4, description), \
                color = COALESCE($5, color) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tag and its post associations. Returns `true` if it existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete several tags, one statement per id.
    ///
    /// Missing ids and database failures are recorded per item; the loop
    /// never stops early.
    pub async fn bulk_delete(pool: &PgPool, ids: &[DbId]) -> Result<BulkResult, sqlx::Error> {
        let mut result = BulkResult::default();

        for id in dedup_ids(ids) {
            match Self::delete(pool, id).await {
                Ok(true) => result.record_success(id),
                Ok(false) => result.record_failure(id, "Tag not found"),
                Err(e) => {
                    tracing::warn!(tag_id = id, error = %e, "Bulk tag delete failed for item");
                    result.record_failure(id, e.to_string());
                }
            }
        }

        Ok(result)
    }
}
