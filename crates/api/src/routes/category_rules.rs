//! Route definitions for keyword categorization rules.

use axum::routing::get;
use axum::Router;

use crate::handlers::category_rules;
use crate::state::AppState;

/// Routes mounted at `/category-rules`.
///
/// ```text
/// GET    /        -> list_rules (?category_id)
/// POST   /        -> create_rule
/// GET    /{id}    -> get_rule
/// PUT    /{id}    -> update_rule
/// DELETE /{id}    -> delete_rule
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(category_rules::list_rules).post(category_rules::create_rule),
        )
        .route(
            "/{id}",
            get(category_rules::get_rule)
                .put(category_rules::update_rule)
                .delete(category_rules::delete_rule),
        )
}
