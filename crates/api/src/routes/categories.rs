//! Route definitions for the `/categories` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /               -> list_categories
/// POST   /               -> create_category
/// GET    /tree           -> category_tree
/// POST   /bulk-delete    -> bulk_delete_categories
/// POST   /bulk-toggle    -> bulk_toggle_categories
/// PUT    /reorder        -> reorder_categories
/// GET    /export         -> export_to_csv
/// POST   /import         -> import_from_csv (raw CSV body)
/// GET    /{id}           -> get_category
/// PUT    /{id}           -> update_category
/// DELETE /{id}           -> delete_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/tree", get(categories::category_tree))
        .route("/bulk-delete", post(categories::bulk_delete_categories))
        .route("/bulk-toggle", post(categories::bulk_toggle_categories))
        .route("/reorder", put(categories::reorder_categories))
        .route("/export", get(categories::export_to_csv))
        .route("/import", post(categories::import_from_csv))
        .route(
            "/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
}
