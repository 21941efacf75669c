//! Notification model and DTOs.

use jacms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Accepted values for `kind`.
pub const NOTIFICATION_KINDS: &[&str] = &["info", "success", "warning", "error"];

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub kind: Option<String>,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
}

/// Query parameters for `GET /notifications`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationListParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
