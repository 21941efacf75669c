//! Route definitions for SEO analysis.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::seo;
use crate::state::AppState;

/// Routes mounted at `/enhanced-seo`.
///
/// ```text
/// POST /analyze       -> analyze_content (ad-hoc payload)
/// GET  /posts/{id}    -> analyze_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(seo::analyze_content))
        .route("/posts/{id}", get(seo::analyze_post))
}
