//! Route definitions for the `/tags` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/tags`.
///
/// ```text
/// GET    /              -> list_tags
/// POST   /              -> create_tag
/// POST   /bulk-delete   -> bulk_delete_tags
/// GET    /{id}          -> get_tag
/// PUT    /{id}          -> update_tag
/// DELETE /{id}          -> delete_tag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_tags).post(tags::create_tag))
        .route("/bulk-delete", post(tags::bulk_delete_tags))
        .route(
            "/{id}",
            get(tags::get_tag)
                .put(tags::update_tag)
                .delete(tags::delete_tag),
        )
}
