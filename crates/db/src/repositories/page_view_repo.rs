//! Repository for the `page_views` table and traffic aggregates.

use jacms_core::traffic::TrafficSource;
use sqlx::PgPool;

use crate::models::page_view::{PageView, PathCount, RecordPageView, SourceCount};

/// Column list for `page_views` queries.
const COLUMNS: &str = "id, path, post_id, referrer, source, session_id, user_agent, \
    created_at, updated_at";

/// Number of paths returned in the real-time top list.
pub const TOP_PAGES_LIMIT: i64 = 10;

/// Records page views and aggregates them for analytics.
pub struct PageViewRepo;

impl PageViewRepo {
    /// Store one view with its already classified `source`.
    pub async fn record(
        pool: &PgPool,
        input: &RecordPageView,
        source: TrafficSource,
        user_agent: Option<&str>,
    ) -> Result<PageView, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_views (path, post_id, referrer, source, session_id, user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageView>(&query)
            .bind(input.path.trim())
            .bind(input.post_id)
            .bind(&input.referrer)
            .bind(source.as_str())
            .bind(&input.session_id)
            .bind(user_agent)
            .fetch_one(pool)
            .await
    }

    /// View counts per source over the last `days` days.
    pub async fn source_counts(pool: &PgPool, days: i64) -> Result<Vec<SourceCount>, sqlx::Error> {
        sqlx::query_as::<_, SourceCount>(
            "SELECT source, COUNT(*) AS views \
             FROM page_views \
             WHERE created_at >= NOW() - make_interval(days => $1::int) \
             GROUP BY source \
             ORDER BY views DESC, source ASC",
        )
        .bind(days)
        .fetch_all(pool)
        .await
    }

    /// Views and distinct sessions in the last `minutes` minutes.
    pub async fn recent_activity(pool: &PgPool, minutes: i64) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT COUNT(*), COUNT(DISTINCT session_id) \
             FROM page_views \
             WHERE created_at >= NOW() - make_interval(mins => $1::int)",
        )
        .bind(minutes)
        .fetch_one(pool)
        .await
    }

    /// Most viewed paths in the last `minutes` minutes.
    pub async fn top_paths(pool: &PgPool, minutes: i64) -> Result<Vec<PathCount>, sqlx::Error> {
        sqlx::query_as::<_, PathCount>(
            "SELECT path, COUNT(*) AS views \
             FROM page_views \
             WHERE created_at >= NOW() - make_interval(mins => $1::int) \
             GROUP BY path \
             ORDER BY views DESC, path ASC \
             LIMIT $2",
        )
        .bind(minutes)
        .bind(TOP_PAGES_LIMIT)
        .fetch_all(pool)
        .await
    }
}
