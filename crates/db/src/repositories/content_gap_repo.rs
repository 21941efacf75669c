//! Coverage queries feeding content gap analysis.

use jacms_core::content_gap::{CategoryCoverage, TagUsage};
use jacms_core::post::PostStatus;
use jacms_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgPool};

#[derive(Debug, FromRow)]
struct CoverageRow {
    id: DbId,
    name: String,
    slug: String,
    published_posts: i64,
    last_published_at: Option<Timestamp>,
}

#[derive(Debug, FromRow)]
struct TagUsageRow {
    id: DbId,
    name: String,
    slug: String,
    posts_count: i64,
}

/// Reads published-post coverage per category and usage per tag.
pub struct ContentGapRepo;

impl ContentGapRepo {
    /// Published-post counts for every active category.
    pub async fn category_coverage(pool: &PgPool) -> Result<Vec<CategoryCoverage>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CoverageRow>(
            "SELECT c.id, c.name, c.slug, \
                    COUNT(p.id) AS published_posts, \
                    MAX(p.published_at) AS last_published_at \
             FROM categories c \
             LEFT JOIN post_categories pc ON pc.category_id = c.id \
             LEFT JOIN posts p ON p.id = pc.post_id AND p.status_id = $1 \
             WHERE c.is_active \
             GROUP BY c.id, c.name, c.slug \
             ORDER BY c.sort_order ASC, c.name ASC",
        )
        .bind(PostStatus::Published.id())
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryCoverage {
                category_id: r.id,
                name: r.name,
                slug: r.slug,
                published_posts: r.published_posts,
                last_published_at: r.last_published_at,
            })
            .collect())
    }

    /// Post counts for every tag.
    pub async fn tag_usage(pool: &PgPool) -> Result<Vec<TagUsage>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TagUsageRow>(
            "SELECT t.id, t.name, t.slug, COUNT(pt.post_id) AS posts_count \
             FROM tags t \
             LEFT JOIN post_tags pt ON pt.tag_id = t.id \
             GROUP BY t.id, t.name, t.slug \
             ORDER BY t.name ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TagUsage {
                tag_id: r.id,
                name: r.name,
                slug: r.slug,
                posts_count: r.posts_count,
            })
            .collect())
    }
}
