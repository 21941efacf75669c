//! Handlers for `/dashboard`: per-user settings, overview counts, recent
//! posts and the widget catalog.

use axum::extract::{Query, State};
use axum::Json;
use jacms_core::pagination::clamp_limit;
use jacms_db::models::dashboard::{DashboardStats, WidgetDefinition, WIDGET_CATALOG};
use jacms_db::models::dashboard_settings::{DashboardSettings, SaveDashboardSettings};
use jacms_db::models::post::PostSummary;
use jacms_db::repositories::{DashboardRepo, DashboardSettingsRepo, PostRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_RECENT_POSTS: i64 = 5;
const MAX_RECENT_POSTS: i64 = 50;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// GET /api/dashboard/settings
///
/// The caller's settings, created with defaults on first access.
pub async fn get_settings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardSettings>>> {
    let settings = DashboardSettingsRepo::get_or_create_settings(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(settings)))
}

/// PUT /api/dashboard/settings
///
/// Upsert the supplied sections; sections left out keep their stored value.
pub async fn save_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SaveDashboardSettings>,
) -> AppResult<Json<DataResponse<DashboardSettings>>> {
    let settings =
        DashboardSettingsRepo::create_or_update_settings(&state.pool, auth.user_id, &input)
            .await?;
    tracing::info!(user_id = auth.user_id, "Dashboard settings saved");
    Ok(Json(DataResponse::new(settings)))
}

/// DELETE /api/dashboard/settings and POST /api/dashboard/settings/reset
///
/// Restore every section to its default.
pub async fn reset_settings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardSettings>>> {
    let settings = DashboardSettingsRepo::reset_settings(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, "Dashboard settings reset");
    Ok(Json(DataResponse::new(settings)))
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// GET /api/dashboard/stats
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let stats = DashboardRepo::stats(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/dashboard/recent-posts?limit=
pub async fn recent_posts(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<PostSummary>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_RECENT_POSTS, MAX_RECENT_POSTS);
    let posts = PostRepo::recent(&state.pool, limit).await?;
    Ok(Json(DataResponse::new(posts)))
}

/// GET /api/dashboard/widgets
pub async fn widgets(_auth: AuthUser) -> Json<DataResponse<&'static [WidgetDefinition]>> {
    Json(DataResponse::new(WIDGET_CATALOG))
}
