//! Security event model and DTOs.

use jacms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const SEVERITIES: &[&str] = &["low", "medium", "high", "critical"];

/// Event type recorded for a rejected login.
pub const EVENT_LOGIN_FAILED: &str = "login_failed";

/// A row from the `security_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SecurityEvent {
    pub id: DbId,
    pub event_type: String,
    pub severity: String,
    pub user_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSecurityEvent {
    pub event_type: String,
    pub severity: Option<String>,
    pub user_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
}

/// Query parameters for `GET /system/security-events`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityEventListParams {
    pub severity: Option<String>,
    pub event_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
