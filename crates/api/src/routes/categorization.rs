//! Route definitions for rule-based category suggestions.

use axum::routing::post;
use axum::Router;

use crate::handlers::categorization;
use crate::state::AppState;

/// Routes mounted at `/ai-categorization`.
///
/// ```text
/// POST /suggest   -> suggest
/// POST /apply     -> apply
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suggest", post(categorization::suggest))
        .route("/apply", post(categorization::apply))
}
