//! Handlers for `/analytics`: page-view recording and traffic reports.
//!
//! Reports are computed from the `page_views` table. The dashboard routes
//! reuse [`traffic_sources`] and [`real_time`].

use axum::extract::{Query, State};
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use jacms_core::error::CoreError;
use jacms_core::traffic::{classify_referrer, percentage, TrafficSource};
use jacms_db::models::page_view::{
    RealTimeReport, RecordPageView, TrafficSourceShare, TrafficSourcesReport,
};
use jacms_db::repositories::PageViewRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::DaysParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Look-back when `?days=` is absent.
const DEFAULT_TRAFFIC_DAYS: i64 = 30;
const MAX_TRAFFIC_DAYS: i64 = 365;

/// Window of the real-time report.
const REAL_TIME_WINDOW_MINS: i64 = 5;

const MAX_PATH_LEN: usize = 2048;

/// POST /api/analytics/page-views
///
/// Public. Records one view, classifying the referrer against the
/// configured site host.
pub async fn record_page_view(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RecordPageView>,
) -> AppResult<impl IntoResponse> {
    let path = input.path.trim();
    if path.is_empty() || !path.starts_with('/') {
        return Err(CoreError::validation("path must start with '/'").into());
    }
    if path.len() > MAX_PATH_LEN {
        return Err(CoreError::validation(format!(
            "path must be at most {MAX_PATH_LEN} characters"
        ))
        .into());
    }

    let source = classify_referrer(input.referrer.as_deref(), state.config.site_host.as_deref());
    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());

    let view = PageViewRepo::record(&state.pool, &input, source, user_agent).await?;
    tracing::debug!(page_view_id = view.id, source = source.as_str(), "Page view recorded");

    Ok((StatusCode::CREATED, Json(DataResponse::new(view))))
}

/// GET /api/analytics/traffic-sources?days=
///
/// View share per source. Every source is listed, including those with no
/// views.
pub async fn traffic_sources(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DaysParams>,
) -> AppResult<Json<DataResponse<TrafficSourcesReport>>> {
    let days = params
        .days
        .unwrap_or(DEFAULT_TRAFFIC_DAYS)
        .clamp(1, MAX_TRAFFIC_DAYS);

    let counts = PageViewRepo::source_counts(&state.pool, days).await?;
    let total_views: i64 = counts.iter().map(|c| c.views).sum();

    let mut sources: Vec<TrafficSourceShare> = TrafficSource::ALL
        .iter()
        .map(|s| {
            let views = counts
                .iter()
                .find(|c| c.source == s.as_str())
                .map_or(0, |c| c.views);
            TrafficSourceShare {
                source: s.as_str().to_string(),
                views,
                percentage: percentage(views, total_views),
            }
        })
        .collect();
    sources.sort_by(|a, b| b.views.cmp(&a.views));

    Ok(Json(DataResponse::new(TrafficSourcesReport {
        days,
        total_views,
        sources,
    })))
}

/// GET /api/analytics/real-time
///
/// Views, distinct sessions and top pages over the last few minutes.
pub async fn real_time(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<RealTimeReport>>> {
    let ((views, active_sessions), top_pages) = futures::try_join!(
        PageViewRepo::recent_activity(&state.pool, REAL_TIME_WINDOW_MINS),
        PageViewRepo::top_paths(&state.pool, REAL_TIME_WINDOW_MINS),
    )?;

    Ok(Json(DataResponse::new(RealTimeReport {
        window_minutes: REAL_TIME_WINDOW_MINS,
        views,
        active_sessions,
        top_pages,
    })))
}
