//! Route definitions for content gap analysis.

use axum::routing::get;
use axum::Router;

use crate::handlers::content_gap;
use crate::state::AppState;

/// Routes mounted at `/content-gap-analysis`.
///
/// ```text
/// GET /          -> analyze (?min_posts, stale_days)
/// GET /summary   -> summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(content_gap::analyze))
        .route("/summary", get(content_gap::summary))
}
