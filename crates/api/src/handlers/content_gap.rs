//! Handlers for `/content-gap-analysis`.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use jacms_core::content_gap::{find_gaps, summarize, ContentGap, GapSummary, GapThresholds};
use jacms_core::error::CoreError;
use jacms_db::repositories::ContentGapRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GapAnalysis {
    pub min_posts: i64,
    pub stale_days: i64,
    pub summary: GapSummary,
    pub gaps: Vec<ContentGap>,
}

/// GET /api/content-gap-analysis?min_posts=&stale_days=
///
/// Thin, empty and stale active categories plus unused tags, highest
/// priority first.
pub async fn analyze(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(thresholds): Query<GapThresholds>,
) -> AppResult<Json<DataResponse<GapAnalysis>>> {
    let gaps = compute_gaps(&state, thresholds).await?;
    Ok(Json(DataResponse::new(GapAnalysis {
        min_posts: thresholds.min_posts,
        stale_days: thresholds.stale_days,
        summary: summarize(&gaps),
        gaps,
    })))
}

/// GET /api/content-gap-analysis/summary?min_posts=&stale_days=
pub async fn summary(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(thresholds): Query<GapThresholds>,
) -> AppResult<Json<DataResponse<GapSummary>>> {
    let gaps = compute_gaps(&state, thresholds).await?;
    Ok(Json(DataResponse::new(summarize(&gaps))))
}

async fn compute_gaps(state: &AppState, thresholds: GapThresholds) -> AppResult<Vec<ContentGap>> {
    if thresholds.min_posts < 1 || thresholds.stale_days < 1 {
        return Err(CoreError::validation("min_posts and stale_days must be at least 1").into());
    }

    let (categories, tags) = futures::try_join!(
        ContentGapRepo::category_coverage(&state.pool),
        ContentGapRepo::tag_usage(&state.pool),
    )?;
    Ok(find_gaps(&categories, &tags, thresholds, Utc::now()))
}
