//! Per-user dashboard settings model and DTO.

use jacms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `dashboard_settings` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct DashboardSettings {
    pub id: DbId,
    pub user_id: DbId,
    pub widgets: serde_json::Value,
    pub layout: serde_json::Value,
    pub appearance: serde_json::Value,
    pub data: serde_json::Value,
    pub grid_layout: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Partial settings payload. A missing section takes its default on
/// insert and keeps the stored value on update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveDashboardSettings {
    pub widgets: Option<serde_json::Value>,
    pub layout: Option<serde_json::Value>,
    pub appearance: Option<serde_json::Value>,
    pub data: Option<serde_json::Value>,
    pub grid_layout: Option<serde_json::Value>,
}
