//! Route definitions for the `/posts` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::posts;
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET    /        -> list_posts
/// POST   /        -> create_post
/// GET    /{id}    -> get_post
/// PUT    /{id}    -> update_post (full)
/// PATCH  /{id}    -> quick_edit_post (partial)
/// DELETE /{id}    -> delete_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::list_posts).post(posts::create_post))
        .route(
            "/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .patch(posts::quick_edit_post)
                .delete(posts::delete_post),
        )
}
