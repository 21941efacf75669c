//! Route definitions for analytics.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// POST /page-views        -> record_page_view (public)
/// GET  /traffic-sources   -> traffic_sources (?days)
/// GET  /real-time         -> real_time
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/page-views", post(analytics::record_page_view))
        .route("/traffic-sources", get(analytics::traffic_sources))
        .route("/real-time", get(analytics::real_time))
}
