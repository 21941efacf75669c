//! Route definitions for the `/menus` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::menus;
use crate::state::AppState;

/// Routes mounted at `/menus`.
///
/// ```text
/// GET    /                      -> list_menus
/// POST   /                      -> create_menu
/// GET    /location/{location}   -> get_menu_by_location
/// GET    /{id}                  -> get_menu (with item tree)
/// PUT    /{id}                  -> update_menu (items reconciled by id)
/// DELETE /{id}                  -> delete_menu
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(menus::list_menus).post(menus::create_menu))
        .route("/location/{location}", get(menus::get_menu_by_location))
        .route(
            "/{id}",
            get(menus::get_menu)
                .put(menus::update_menu)
                .delete(menus::delete_menu),
        )
}
