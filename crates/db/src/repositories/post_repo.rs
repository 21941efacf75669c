//! Repository for the `posts` table and its taxonomy junctions.

use jacms_core::bulk::dedup_ids;
use jacms_core::pagination::{clamp_limit, clamp_offset, like_pattern, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use jacms_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::page::Page;
use crate::models::post::{Post, PostListParams, PostSummary, PostWithRelations, PostWrite};

/// Column list for `posts` queries, with the status name resolved.
///
/// The status subquery references `posts` by name so the list also works
/// in `RETURNING` clauses.
const COLUMNS: &str = "posts.id, posts.title, posts.slug, posts.excerpt, posts.content, \
    posts.featured_image, posts.status_id, \
    (SELECT ps.name FROM post_statuses ps WHERE ps.id = posts.status_id) AS status, \
    posts.author_id, posts.meta_title, posts.meta_description, posts.focus_keyword, \
    posts.published_at, posts.scheduled_at, posts.created_at, posts.updated_at";

/// List filter; `$1..$5` are status id, category id, tag id, author id and
/// search pattern.
const LIST_FILTER: &str = "($1::smallint IS NULL OR posts.status_id = $1) \
    AND ($2::bigint IS NULL OR EXISTS \
        (SELECT 1 FROM post_categories pc WHERE pc.post_id = posts.id AND pc.category_id = $2)) \
    AND ($3::bigint IS NULL OR EXISTS \
        (SELECT 1 FROM post_tags pt WHERE pt.post_id = posts.id AND pt.tag_id = $3)) \
    AND ($4::bigint IS NULL OR posts.author_id = $4) \
    AND ($5::text IS NULL OR posts.title ILIKE $5 OR posts.content ILIKE $5)";

/// Provides CRUD operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Filtered, paginated list, newest first.
    pub async fn list(pool: &PgPool, params: &PostListParams) -> Result<Page<Post>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);
        let status_id = params.status.map(|s| s.id());
        let pattern = params
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(like_pattern);

        let query = format!(
            "SELECT {COLUMNS} FROM posts \
             WHERE {LIST_FILTER} \
             ORDER BY posts.created_at DESC, posts.id DESC \
             LIMIT $6 OFFSET $7"
        );
        let items = sqlx::query_as::<_, Post>(&query)
            .bind(status_id)
            .bind(params.category_id)
            .bind(params.tag_id)
            .bind(params.author_id)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM posts WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(status_id)
            .bind(params.category_id)
            .bind(params.tag_id)
            .bind(params.author_id)
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

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE posts.id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A post with its category and tag ids.
    pub async fn find_with_relations(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PostWithRelations>, sqlx::Error> {
        let Some(post) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let (category_ids, tag_ids) = Self::relation_ids(pool, id).await?;
        Ok(Some(PostWithRelations {
            post,
            category_ids,
            tag_ids,
        }))
    }

    async fn relation_ids(pool: &PgPool, id: DbId) -> Result<(Vec<DbId>, Vec<DbId>), sqlx::Error> {
        let category_ids: Vec<DbId> = sqlx::query_scalar(
            "SELECT category_id FROM post_categories WHERE post_id = $1 ORDER BY category_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        let tag_ids: Vec<DbId> =
            sqlx::query_scalar("SELECT tag_id FROM post_tags WHERE post_id = $1 ORDER BY tag_id")
                .bind(id)
                .fetch_all(pool)
                .await?;
        Ok((category_ids, tag_ids))
    }

    /// Most recently updated posts for the dashboard.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<PostSummary>, sqlx::Error> {
        sqlx::query_as::<_, PostSummary>(
            "SELECT p.id, p.title, p.slug, ps.name AS status, p.author_id, \
                    p.published_at, p.updated_at \
             FROM posts p \
             JOIN post_statuses ps ON ps.id = p.status_id \
             ORDER BY p.updated_at DESC, p.id DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Insert a post and its associations in one transaction.
    pub async fn create(
        pool: &PgPool,
        write: &PostWrite,
        author_id: DbId,
        category_ids: &[DbId],
        tag_ids: &[DbId],
    ) -> Result<PostWithRelations, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO posts \
                (title, slug, excerpt, content, featured_image, status_id, author_id, \
                 meta_title, meta_description, focus_keyword, published_at, scheduled_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(&write.title)
            .bind(&write.slug)
            .bind(&write.excerpt)
            .bind(&write.content)
            .bind(&write.featured_image)
            .bind(write.status.id())
            .bind(author_id)
            .bind(&write.meta_title)
            .bind(&write.meta_description)
            .bind(&write.focus_keyword)
            .bind(write.published_at)
            .bind(write.scheduled_at)
            .fetch_one(&mut *tx)
            .await?;

        let category_ids = dedup_ids(category_ids);
        let tag_ids = dedup_ids(tag_ids);
        replace_categories(&mut tx, post.id, &category_ids).await?;
        replace_tags(&mut tx, post.id, &tag_ids).await?;

        tx.commit().await?;
        Ok(PostWithRelations {
            post,
            category_ids,
            tag_ids,
        })
    }

    /// Overwrite a post's columns and, when given, its association sets.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        write: &PostWrite,
        category_ids: Option<&[DbId]>,
        tag_ids: Option<&[DbId]>,
    ) -> Result<Option<PostWithRelations>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE posts SET \
                title = $2, slug = $3, excerpt = $4, content = $5, featured_image = $6, \
                status_id = $7, meta_title = $8, meta_description = $9, focus_keyword = $10, \
                published_at = $11, scheduled_at = $12 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&write.title)
            .bind(&write.slug)
            .bind(&write.excerpt)
            .bind(&write.content)
            .bind(&write.featured_image)
            .bind(write.status.id())
            .bind(&write.meta_title)
            .bind(&write.meta_description)
            .bind(&write.focus_keyword)
            .bind(write.published_at)
            .bind(write.scheduled_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(post) = post else {
            return Ok(None);
        };

        if let Some(ids) = category_ids {
            replace_categories(&mut tx, id, &dedup_ids(ids)).await?;
        }
        if let Some(ids) = tag_ids {
            replace_tags(&mut tx, id, &dedup_ids(ids)).await?;
        }
        tx.commit().await?;

        let (category_ids, tag_ids) = Self::relation_ids(pool, id).await?;
        Ok(Some(PostWithRelations {
            post,
            category_ids,
            tag_ids,
        }))
    }

    /// Add category associations without removing existing ones.
    /// Returns the number of new links.
    pub async fn add_categories(
        pool: &PgPool,
        post_id: DbId,
        category_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO post_categories (post_id, category_id) \
             SELECT $1, UNNEST($2::bigint[]) \
             ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(dedup_ids(category_ids))
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn replace_categories(
    tx: &mut Transaction<'_, Postgres>,
    post_id: DbId,
    ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;
    if !ids.is_empty() {
        sqlx::query(
            "INSERT INTO post_categories (post_id, category_id) \
             SELECT $1, UNNEST($2::bigint[])",
        )
        .bind(post_id)
        .bind(ids)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn replace_tags(
    tx: &mut Transaction<'_, Postgres>,
    post_id: DbId,
    ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;
    if !ids.is_empty() {
        sqlx::query("INSERT INTO post_tags (post_id, tag_id) SELECT $1, UNNEST($2::bigint[])")
            .bind(post_id)
            .bind(ids)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}
