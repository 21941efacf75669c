//! Handlers for `/system`: health metrics and security events.
//!
//! Reading health is open to any authenticated user; recording metrics and
//! everything touching security events is admin-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jacms_core::error::CoreError;
use jacms_core::pagination::clamp_limit;
use jacms_db::models::page::Page;
use jacms_db::models::security_event::{
    CreateSecurityEvent, SecurityEvent, SecurityEventListParams, SEVERITIES,
};
use jacms_db::models::system_health::{
    RecordHealthMetric, SystemHealthMetric, SystemHealthOverview, HEALTH_STATUSES,
};
use jacms_db::repositories::{SecurityEventRepo, SystemHealthRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_HISTORY: i64 = 50;
const MAX_HISTORY: i64 = 500;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// GET /api/system/health
///
/// Latest sample per metric; the overall status is the worst of them.
pub async fn health_overview(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SystemHealthOverview>>> {
    let metrics = SystemHealthRepo::latest(&state.pool).await?;
    let overall_status = worst_status(&metrics).to_string();
    Ok(Json(DataResponse::new(SystemHealthOverview {
        overall_status,
        metrics,
    })))
}

/// GET /api/system/health/{metric}?limit=
pub async fn metric_history(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(metric): Path<String>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<SystemHealthMetric>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_HISTORY, MAX_HISTORY);
    let samples = SystemHealthRepo::history(&state.pool, &metric, limit).await?;
    Ok(Json(DataResponse::new(samples)))
}

/// POST /api/system/health
pub async fn record_metric(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<RecordHealthMetric>,
) -> AppResult<impl IntoResponse> {
    if input.metric.trim().is_empty() {
        return Err(CoreError::validation("metric must not be empty").into());
    }
    if !input.value.is_finite() {
        return Err(CoreError::validation("value must be a finite number").into());
    }
    let status = input.status.as_deref().unwrap_or("healthy");
    ensure_one_of("status", status, HEALTH_STATUSES)?;

    let sample = SystemHealthRepo::record(&state.pool, &input, status).await?;
    tracing::info!(
        metric = %sample.metric,
        status,
        user_id = admin.user_id,
        "Health metric recorded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(sample))))
}

// ---------------------------------------------------------------------------
// Security events
// ---------------------------------------------------------------------------

/// GET /api/system/security-events?severity=&event_type=&limit=&offset=
pub async fn list_security_events(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SecurityEventListParams>,
) -> AppResult<Json<DataResponse<Page<SecurityEvent>>>> {
    if let Some(severity) = params.severity.as_deref() {
        ensure_one_of("severity", severity, SEVERITIES)?;
    }
    let page = SecurityEventRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(page)))
}

/// POST /api/system/security-events
pub async fn record_security_event(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSecurityEvent>,
) -> AppResult<impl IntoResponse> {
    if input.event_type.trim().is_empty() {
        return Err(CoreError::validation("event_type must not be empty").into());
    }
    let severity = input.severity.as_deref().unwrap_or("low");
    ensure_one_of("severity", severity, SEVERITIES)?;

    let event = SecurityEventRepo::create(&state.pool, &input, severity).await?;
    tracing::warn!(
        event_id = event.id,
        event_type = %event.event_type,
        severity,
        user_id = admin.user_id,
        "Security event recorded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(event))))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ensure_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if !allowed.contains(&value) {
        return Err(CoreError::validation(format!(
            "Invalid {field} '{value}'. Must be one of: {}",
            allowed.join(", ")
        )));
    }
    Ok(())
}

/// Worst status across `metrics`, by position in [`HEALTH_STATUSES`].
/// No metrics at all counts as healthy.
fn worst_status(metrics: &[SystemHealthMetric]) -> &'static str {
    metrics
        .iter()
        .filter_map(|m| HEALTH_STATUSES.iter().position(|s| *s == m.status))
        .max()
        .map_or(HEALTH_STATUSES[0], |i| HEALTH_STATUSES[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(status: &str) -> SystemHealthMetric {
        SystemHealthMetric {
            id: 1,
            metric: "cpu".into(),
            value: 0.5,
            unit: None,
            status: status.into(),
            details: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn worst_status_of_nothing_is_healthy() {
        assert_eq!(worst_status(&[]), "healthy");
    }

    #[test]
    fn worst_status_picks_most_severe() {
        let metrics = [sample("healthy"), sample("critical"), sample("warning")];
        assert_eq!(worst_status(&metrics), "critical");
    }

    #[test]
    fn ensure_one_of_lists_allowed_values() {
        assert!(ensure_one_of("severity", "high", SEVERITIES).is_ok());
        let err = ensure_one_of("severity", "extreme", SEVERITIES).unwrap_err();
        assert!(err.to_string().contains("low, medium, high, critical"));
    }
}
