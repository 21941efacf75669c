//! System health metric model and DTOs.

use jacms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const HEALTH_STATUSES: &[&str] = &["healthy", "warning", "critical"];

/// A row from the `system_health_metrics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SystemHealthMetric {
    pub id: DbId,
    pub metric: String,
    pub value: f64,
    pub unit: Option<String>,
    pub status: String,
    pub details: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordHealthMetric {
    pub metric: String,
    pub value: f64,
    pub unit: Option<String>,
    pub status: Option<String>,
    pub details: Option<serde_json::Value>,
}

/// Latest metrics plus the worst status among them.
#[derive(Debug, Clone, Serialize)]
pub struct SystemHealthOverview {
    pub overall_status: String,
    pub metrics: Vec<SystemHealthMetric>,
}
