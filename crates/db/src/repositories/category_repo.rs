//! Repository for the `categories` table.
//!
//! Besides CRUD this covers the bulk operations (with an explicit
//! [`BulkMode`]), drag-and-drop reordering and CSV import/export.

use std::collections::HashMap;

use jacms_core::bulk::{dedup_ids, BulkMode, BulkResult};
use jacms_core::category_csv::{CategoryCsvRow, CsvRowError, ParsedCategoryCsv};
use jacms_core::hierarchy::{build_forest, HierarchyMove, TreeNode};
use jacms_core::pagination::{clamp_limit, clamp_offset, like_pattern, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use jacms_core::types::DbId;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::models::category::{
    Category, CategoryImportReport, CategoryListParams, CategoryWithCounts, CreateCategory,
    UpdateCategory,
};
use crate::models::page::Page;

/// Column list for `categories` queries.
const COLUMNS: &str = "id, name, slug, description, color, icon, parent_id, sort_order, \
    is_active, created_at, updated_at";

/// Column list including computed counts (table alias `c`).
const COUNT_COLUMNS: &str = "c.id, c.name, c.slug, c.description, c.color, c.icon, \
    c.parent_id, c.sort_order, c.is_active, \
    (SELECT COUNT(*) FROM post_categories pc WHERE pc.category_id = c.id) AS posts_count, \
    (SELECT COUNT(*) FROM categories ch WHERE ch.parent_id = c.id) AS subcategories_count, \
    c.created_at, c.updated_at";

/// List filter; parameters `$1..$4` are search pattern, parent id,
/// root-only flag and active flag.
const LIST_FILTER: &str = "($1::text IS NULL OR c.name ILIKE $1 OR c.slug ILIKE $1) \
    AND ($2::bigint IS NULL OR c.parent_id = $2) \
    AND (NOT $3 OR c.parent_id IS NULL) \
    AND ($4::boolean IS NULL OR c.is_active = $4)";

/// Why a category delete was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteRefusal {
    NotFound,
    InUse { posts: i64, subcategories: i64 },
}

impl std::fmt::Display for DeleteRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => f.write_str("Category not found"),
            Self::InUse { posts, .. } if *posts > 0 => {
                write!(f, "Category has {posts} post(s); reassign them first")
            }
            Self::InUse { subcategories, .. } => write!(
                f,
                "Category has {subcategories} subcategory(ies); move or delete them first"
            ),
        }
    }
}

#[derive(Debug, FromRow)]
struct UsageRow {
    posts_count: i64,
    subcategories_count: i64,
}

#[derive(Debug, FromRow)]
struct CsvExportRow {
    name: String,
    slug: String,
    description: Option<String>,
    color: Option<String>,
    icon: Option<String>,
    parent_slug: Option<String>,
    sort_order: i32,
    is_active: bool,
}

/// Provides CRUD, bulk, hierarchy and CSV operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Filtered, paginated list with counts, ordered by `sort_order` then name.
    pub async fn list(
        pool: &PgPool,
        params: &CategoryListParams,
    ) -> Result<Page<CategoryWithCounts>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);
        let pattern = params
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(like_pattern);

        let query = format!(
            "SELECT {COUNT_COLUMNS} FROM categories c \
             WHERE {LIST_FILTER} \
             ORDER BY c.sort_order ASC, c.name ASC, c.id ASC \
             LIMIT $5 OFFSET $6"
        );
        let items = sqlx::query_as::<_, CategoryWithCounts>(&query)
            .bind(&pattern)
            .bind(params.parent_id)
            .bind(params.root_only)
            .bind(params.is_active)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM categories c WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&pattern)
            .bind(params.parent_id)
            .bind(params.root_only)
            .bind(params.is_active)
            .fetch_one(pool)
            .await?;

        Ok(Page {
            items,
            total,
            limit,
            offset,
        })
    }

    /// Every category nested under its parent, siblings in display order.
    pub async fn tree(pool: &PgPool) -> Result<Vec<TreeNode<CategoryWithCounts>>, sqlx::Error> {
        let query = format!(
            "SELECT {COUNT_COLUMNS} FROM categories c \
             ORDER BY c.sort_order ASC, c.name ASC, c.id ASC"
        );
        let rows = sqlx::query_as::<_, CategoryWithCounts>(&query)
            .fetch_all(pool)
            .await?;
        Ok(build_forest(rows, |c| c.id, |c| c.parent_id))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CategoryWithCounts>, sqlx::Error> {
        let query = format!("SELECT {COUNT_COLUMNS} FROM categories c WHERE c.id = $1");
        sqlx::query_as::<_, CategoryWithCounts>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// All `(id, parent_id)` pairs, for hierarchy validation.
    pub async fn parent_pairs(pool: &PgPool) -> Result<Vec<(DbId, Option<DbId>)>, sqlx::Error> {
        sqlx::query_as("SELECT id, parent_id FROM categories")
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a category with an already resolved `slug`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCategory,
        slug: &str,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories \
                (name, slug, description, color, icon, parent_id, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0), COALESCE($8, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(input.name.trim())
            .bind(slug)
            .bind(&input.description)
            .bind(&input.color)
            .bind(&input.icon)
            .bind(input.parent_id)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Update a category. Only supplied fields are applied; an explicit
    /// `parent_id: null` moves the category to the top level.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET \
                name = COALESCE($2, name), \
                slug = COALESCE($3, slug), \
                description = COALESCE($4, description), \
                color = COALESCE($5, color), \
                icon = COALESCE($6, icon), \
                parent_id = CASE WHEN $7 THEN $8 ELSE parent_id END, \
                sort_order = COALESCE($9, sort_order), \
                is_active = COALESCE($10, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.color)
            .bind(&input.icon)
            .bind(input.parent_id.is_some())
            .bind(input.parent_id.flatten())
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete one category unless it still has posts or subcategories.
    ///
    /// The check and the delete share one transaction holding the row lock.
    pub async fn delete_if_empty(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Result<(), DeleteRefusal>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let outcome = Self::delete_if_empty_in(&mut tx, id).await?;
        if outcome.is_ok() {
            tx.commit().await?;
        }
        Ok(outcome)
    }

    /// Apply a validated set of hierarchy moves in one transaction.
    pub async fn reorder(pool: &PgPool, moves: &[HierarchyMove]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for m in moves {
            sqlx::query("UPDATE categories SET parent_id = $2, sort_order = $3 WHERE id = $1")
                .bind(m.id)
                .bind(m.parent_id)
                .bind(m.sort_order)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await
    }

    // -----------------------------------------------------------------------
    // Bulk operations
    // -----------------------------------------------------------------------

    /// Delete several categories, skipping any that still have posts or
    /// subcategories.
    ///
    /// In [`BulkMode::PerItem`] each id is checked and deleted in its own
    /// transaction. In [`BulkMode::AllOrNothing`] the batch shares one
    /// transaction that is rolled back if any id fails.
    pub async fn bulk_delete_categories(
        pool: &PgPool,
        ids: &[DbId],
        mode: BulkMode,
    ) -> Result<BulkResult, sqlx::Error> {
        let ids = dedup_ids(ids);
        match mode {
            BulkMode::PerItem => {
                let mut result = BulkResult::default();
                for id in ids {
                    let mut tx = pool.begin().await?;
                    match Self::delete_if_empty_in(&mut tx, id).await {
                        Ok(Ok(())) => {
                            tx.commit().await?;
                            result.record_success(id);
                        }
                        Ok(Err(refusal)) => result.record_failure(id, refusal.to_string()),
                        Err(e) => {
                            tracing::warn!(category_id = id, error = %e, "Bulk category delete failed for item");
                            result.record_failure(id, e.to_string());
                        }
                    }
                }
                Ok(result)
            }
            BulkMode::AllOrNothing => {
                let mut tx = pool.begin().await?;
                let mut result = BulkResult::default();
                for id in ids {
                    match Self::delete_if_empty_in(&mut tx, id).await {
                        Ok(Ok(())) => result.record_success(id),
                        Ok(Err(refusal)) => result.record_failure(id, refusal.to_string()),
                        Err(e) => {
                            // The transaction is aborted; later statements would fail too.
                            result.record_failure(id, e.to_string());
                            break;
                        }
                    }
                }
                Self::finish_batch(tx, result).await
            }
        }
    }

    /// Set `is_active` on several categories.
    pub async fn bulk_toggle_categories(
        pool: &PgPool,
        ids: &[DbId],
        is_active: bool,
        mode: BulkMode,
    ) -> Result<BulkResult, sqlx::Error> {
        let ids = dedup_ids(ids);
        match mode {
            BulkMode::PerItem => {
                let mut result = BulkResult::default();
                for id in ids {
                    let mut tx = pool.begin().await?;
                    match Self::set_active(&mut tx, id, is_active).await {
                        Ok(true) => {
                            tx.commit().await?;
                            result.record_success(id);
                        }
                        Ok(false) => result.record_failure(id, "Category not found"),
                        Err(e) => result.record_failure(id, e.to_string()),
                    }
                }
                Ok(result)
            }
            BulkMode::AllOrNothing => {
                let mut tx = pool.begin().await?;
                let mut result = BulkResult::default();
                for id in ids {
                    match Self::set_active(&mut tx, id, is_active).await {
                        Ok(true) => result.record_success(id),
                        Ok(false) => result.record_failure(id, "Category not found"),
                        Err(e) => {
                            result.record_failure(id, e.to_string());
                            break;
                        }
                    }
                }
                Self::finish_batch(tx, result).await
            }
        }
    }

    /// Commit an all-or-nothing batch, or roll it back if anything failed.
    async fn finish_batch(
        tx: Transaction<'_, Postgres>,
        mut result: BulkResult,
    ) -> Result<BulkResult, sqlx::Error> {
        if result.has_failures() {
            tx.rollback().await?;
            result.mark_rolled_back();
        } else {
            tx.commit().await?;
        }
        Ok(result)
    }

    /// Delete one category inside `tx` unless it is in use.
    ///
    /// The row is locked before counting. Counting in a separate statement
    /// sees links committed while the lock was awaited. The outer `Result`
    /// carries database errors; the inner one the reason for refusing.
    async fn delete_if_empty_in(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Result<(), DeleteRefusal>, sqlx::Error> {
        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM categories WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;
        if locked.is_none() {
            return Ok(Err(DeleteRefusal::NotFound));
        }

        let usage = sqlx::query_as::<_, UsageRow>(
            "SELECT \
                (SELECT COUNT(*) FROM post_categories WHERE category_id = $1) AS posts_count, \
                (SELECT COUNT(*) FROM categories WHERE parent_id = $1) AS subcategories_count",
        )
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;

        if usage.posts_count > 0 || usage.subcategories_count > 0 {
            return Ok(Err(DeleteRefusal::InUse {
                posts: usage.posts_count,
                subcategories: usage.subcategories_count,
            }));
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(Ok(()))
    }

    async fn set_active(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        is_active: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE categories SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(is_active)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // CSV
    // -----------------------------------------------------------------------

    /// All categories as CSV rows, parents referenced by slug.
    pub async fn export_rows(pool: &PgPool) -> Result<Vec<CategoryCsvRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CsvExportRow>(
            "SELECT c.name, c.slug, c.description, c.color, c.icon, p.slug AS parent_slug, \
                    c.sort_order, c.is_active \
             FROM categories c \
             LEFT JOIN categories p ON p.id = c.parent_id \
             ORDER BY c.sort_order ASC, c.name ASC, c.id ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryCsvRow {
                name: r.name,
                slug: r.slug,
                description: r.description,
                color: r.color,
                icon: r.icon,
                parent_slug: r.parent_slug,
                sort_order: r.sort_order,
                is_active: r.is_active,
            })
            .collect())
    }

    /// Upsert parsed CSV rows by slug, then resolve parents by slug.
    ///
    /// Runs in one transaction. Parse errors already collected in `parsed`
    /// are carried into the report; a parent assignment that would close a
    /// cycle is reported against its line and skipped.
    pub async fn import_rows(
        pool: &PgPool,
        parsed: ParsedCategoryCsv,
    ) -> Result<CategoryImportReport, sqlx::Error> {
        let mut report = CategoryImportReport {
            errors: parsed.errors,
            ..CategoryImportReport::default()
        };
        let mut tx = pool.begin().await?;

        // Pass 1: upsert every row at top level.
        let mut imported: Vec<(usize, DbId, Option<String>)> = Vec::with_capacity(parsed.rows.len());
        for (line, row) in parsed.rows {
            let (id, inserted): (DbId, bool) = sqlx::query_as(
                "INSERT INTO categories \
                    (name, slug, description, color, icon, parent_id, sort_order, is_active) \
                 VALUES ($1, $2, $3, $4, $5, NULL, $6, $7) \
                 ON CONFLICT (slug) DO UPDATE SET \
                    name = EXCLUDED.name, \
                    description = EXCLUDED.description, \
                    color = EXCLUDED.color, \
                    icon = EXCLUDED.icon, \
                    parent_id = NULL, \
                    sort_order = EXCLUDED.sort_order, \
                    is_active = EXCLUDED.is_active \
                 RETURNING id, (xmax = 0) AS inserted",
            )
            .bind(&row.name)
            .bind(&row.slug)
            .bind(&row.description)
            .bind(&row.color)
            .bind(&row.icon)
            .bind(row.sort_order)
            .bind(row.is_active)
            .fetch_one(&mut *tx)
            .await?;

            if inserted {
                report.created += 1;
            } else {
                report.updated += 1;
            }
            imported.push((line, id, row.parent_slug));
        }

        // Pass 2: resolve parents against the whole table.
        let pairs: Vec<(DbId, String, Option<DbId>)> =
            sqlx::query_as("SELECT id, slug, parent_id FROM categories")
                .fetch_all(&mut *tx)
                .await?;
        let by_slug: HashMap<String, DbId> = pairs.iter().map(|(id, s, _)| (s.clone(), *id)).collect();
        let mut parents: HashMap<DbId, Option<DbId>> =
            pairs.into_iter().map(|(id, _, p)| (id, p)).collect();

        for (line, id, parent_slug) in imported {
            let Some(parent_slug) = parent_slug else { continue };
            let Some(&parent_id) = by_slug.get(&parent_slug) else {
                report.unresolved_parents.push(parent_slug);
                continue;
            };
            if creates_cycle(&parents, id, parent_id) {
                report.errors.push(CsvRowError {
                    line,
                    message: format!("Parent '{parent_slug}' would create a cycle"),
                });
                continue;
            }

            sqlx::query("UPDATE categories SET parent_id = $2 WHERE id = $1")
                .bind(id)
                .bind(parent_id)
                .execute(&mut *tx)
                .await?;
            parents.insert(id, Some(parent_id));
        }

        tx.commit().await?;
        report.errors.sort_by_key(|e| e.line);
        Ok(report)
    }
}

/// Whether making `parent_id` the parent of `id` would close a loop.
fn creates_cycle(parents: &HashMap<DbId, Option<DbId>>, id: DbId, parent_id: DbId) -> bool {
    let mut node = Some(parent_id);
    let mut steps = 0;
    while let Some(current) = node {
        if current == id {
            return true;
        }
        steps += 1;
        if steps > parents.len() {
            return true;
        }
        node = parents.get(&current).copied().flatten();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_detection_walks_ancestors() {
        let parents: HashMap<DbId, Option<DbId>> =
            [(1, None), (2, Some(1)), (3, Some(2))].into_iter().collect();
        assert!(creates_cycle(&parents, 1, 3));
        assert!(!creates_cycle(&parents, 3, 1));
        assert!(creates_cycle(&parents, 4, 4));
    }
}
