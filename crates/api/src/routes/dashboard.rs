//! Route definitions for the dashboard.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{analytics, dashboard};
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET    /settings          -> get_settings (created on first access)
/// PUT    /settings          -> save_settings
/// DELETE /settings          -> reset_settings
/// POST   /settings/reset    -> reset_settings
/// GET    /stats             -> stats
/// GET    /recent-posts      -> recent_posts
/// GET    /widgets           -> widgets
/// GET    /traffic-sources   -> analytics::traffic_sources
/// GET    /real-time         -> analytics::real_time
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/settings",
            get(dashboard::get_settings)
                .put(dashboard::save_settings)
                .delete(dashboard::reset_settings),
        )
        .route("/settings/reset", post(dashboard::reset_settings))
        .route("/stats", get(dashboard::stats))
        .route("/recent-posts", get(dashboard::recent_posts))
        .route("/widgets", get(dashboard::widgets))
        .route("/traffic-sources", get(analytics::traffic_sources))
        .route("/real-time", get(analytics::real_time))
}
