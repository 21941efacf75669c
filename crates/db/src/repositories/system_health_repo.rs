//! Repository for the `system_health_metrics` table.

use sqlx::PgPool;

use crate::models::system_health::{RecordHealthMetric, SystemHealthMetric};

/// Column list for `system_health_metrics` queries.
const COLUMNS: &str = "id, metric, value, unit, status, details, created_at, updated_at";

/// Stores health samples and reads back the latest per metric.
pub struct SystemHealthRepo;

impl SystemHealthRepo {
    pub async fn record(
        pool: &PgPool,
        input: &RecordHealthMetric,
        status: &str,
    ) -> Result<SystemHealthMetric, sqlx::Error> {
        let query = format!(
            "INSERT INTO system_health_metrics (metric, value, unit, status, details) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SystemHealthMetric>(&query)
            .bind(input.metric.trim())
            .bind(input.value)
            .bind(&input.unit)
            .bind(status)
            .bind(&input.details)
            .fetch_one(pool)
            .await
    }

    /// Newest sample of each metric, ordered by metric name.
    pub async fn latest(pool: &PgPool) -> Result<Vec<SystemHealthMetric>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT ON (metric) {COLUMNS} FROM system_health_metrics \
             ORDER BY metric ASC, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SystemHealthMetric>(&query)
            .fetch_all(pool)
            .await
    }

    /// Recent samples of one metric, newest first.
    pub async fn history(
        pool: &PgPool,
        metric: &str,
        limit: i64,
    ) -> Result<Vec<SystemHealthMetric>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM system_health_metrics \
             WHERE metric = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, SystemHealthMetric>(&query)
            .bind(metric)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
