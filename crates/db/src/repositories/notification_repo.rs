//! Repository for the `notifications` table.

use jacms_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use jacms_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{CreateNotification, Notification, NotificationListParams};
use crate::models::page::Page;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, user_id, kind, title, message, link, is_read, read_at, \
    created_at, updated_at";

/// Provides per-user notification feeds.
pub struct NotificationRepo;

impl NotificationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotification,
        kind: &str,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, kind, title, message, link) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.user_id)
            .bind(kind)
            .bind(input.title.trim())
            .bind(&input.message)
            .bind(&input.link)
            .fetch_one(pool)
            .await
    }

    /// A user's notifications, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        params: &NotificationListParams,
    ) -> Result<Page<Notification>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);

        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 AND (NOT $2 OR NOT is_read) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(params.unread_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND (NOT $2 OR NOT is_read)",
        )
        .bind(user_id)
        .bind(params.unread_only)
        .fetch_one(pool)
        .await?;

        Ok(Page {
            items,
            total,
            limit,
            offset,
        })
    }

    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Mark one of the user's notifications read. Returns `None` if it does
    /// not exist or belongs to someone else.
    pub async fn mark_read(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications SET is_read = true, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark every unread notification of the user read; returns how many.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true, read_at = NOW() \
             WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
