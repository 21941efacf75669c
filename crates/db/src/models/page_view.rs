//! Page view model, DTOs and analytics aggregates.

use jacms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `page_views` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageView {
    pub id: DbId,
    pub path: String,
    pub post_id: Option<DbId>,
    pub referrer: Option<String>,
    pub source: String,
    pub session_id: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /analytics/page-views`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPageView {
    pub path: String,
    pub post_id: Option<DbId>,
    pub referrer: Option<String>,
    pub session_id: Option<String>,
}

/// View count for one traffic source.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub views: i64,
}

/// Views per path.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PathCount {
    pub path: String,
    pub views: i64,
}

/// A traffic source share for the dashboard chart.
#[derive(Debug, Clone, Serialize)]
pub struct TrafficSourceShare {
    pub source: String,
    pub views: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrafficSourcesReport {
    pub days: i64,
    pub total_views: i64,
    pub sources: Vec<TrafficSourceShare>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RealTimeReport {
    pub window_minutes: i64,
    pub views: i64,
    pub active_sessions: i64,
    pub top_pages: Vec<PathCount>,
}
