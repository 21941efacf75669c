//! Repository for the `security_events` table.

use jacms_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use sqlx::PgPool;

use crate::models::page::Page;
use crate::models::security_event::{CreateSecurityEvent, SecurityEvent, SecurityEventListParams};

/// Column list for `security_events` queries.
const COLUMNS: &str = "id, event_type, severity, user_id, ip_address, user_agent, description, \
    metadata, created_at, updated_at";

/// `$1` severity, `$2` event type.
const LIST_FILTER: &str =
    "($1::text IS NULL OR severity = $1) AND ($2::text IS NULL OR event_type = $2)";

/// Append-only log of security-relevant activity.
pub struct SecurityEventRepo;

impl SecurityEventRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSecurityEvent,
        severity: &str,
    ) -> Result<SecurityEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO security_events \
                (event_type, severity, user_id, ip_address, user_agent, description, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SecurityEvent>(&query)
            .bind(input.event_type.trim())
            .bind(severity)
            .bind(input.user_id)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .bind(&input.description)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Filtered events, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &SecurityEventListParams,
    ) -> Result<Page<SecurityEvent>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);

        let query = format!(
            "SELECT {COLUMNS} FROM security_events \
             WHERE {LIST_FILTER} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, SecurityEvent>(&query)
            .bind(&params.severity)
            .bind(&params.event_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM security_events WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&params.severity)
            .bind(&params.event_type)
            .fetch_one(pool)
            .await?;

        Ok(Page {
            items,
            total,
            limit,
            offset,
        })
    }
}
