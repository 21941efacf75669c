//! Route definitions for notifications.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET  /               -> list_notifications (?unread_only, limit, offset)
/// POST /               -> create_notification (admin only)
/// GET  /unread-count   -> unread_count
/// PUT  /read-all       -> mark_all_read
/// PUT  /{id}/read      -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route("/unread-count", get(notifications::unread_count))
        .route("/read-all", put(notifications::mark_all_read))
        .route("/{id}/read", put(notifications::mark_read))
}
