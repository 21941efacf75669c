//! Route definitions for category templates.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::category_templates;
use crate::state::AppState;

/// Routes mounted at `/category-templates`.
///
/// ```text
/// GET    /              -> list_templates
/// POST   /              -> create_template
/// GET    /{id}          -> get_template
/// PUT    /{id}          -> update_template
/// DELETE /{id}          -> delete_template
/// POST   /{id}/apply    -> apply_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(category_templates::list_templates).post(category_templates::create_template),
        )
        .route(
            "/{id}",
            get(category_templates::get_template)
                .put(category_templates::update_template)
                .delete(category_templates::delete_template),
        )
        .route("/{id}/apply", post(category_templates::apply_template))
}
