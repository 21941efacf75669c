pub mod analytics;
pub mod auth;
pub mod categories;
pub mod categorization;
pub mod category_rules;
pub mod category_templates;
pub mod content_gap;
pub mod dashboard;
pub mod health;
pub mod menus;
pub mod notifications;
pub mod posts;
pub mod seo;
pub mod system;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
/// /auth/refresh                            refresh (public)
/// /auth/logout                             logout (requires auth)
///
/// /dashboard/settings                      get, save, reset (GET, PUT, DELETE)
/// /dashboard/settings/reset                reset (POST)
/// /dashboard/stats                         overview counts
/// /dashboard/recent-posts                  recent posts (?limit)
/// /dashboard/widgets                       widget catalog
/// /dashboard/traffic-sources               traffic by source (?days)
/// /dashboard/real-time                     last five minutes
///
/// /posts                                   list, create
/// /posts/{id}                              get, update, quick edit, delete
///
/// /categories                              list, create
/// /categories/tree                         hierarchy
/// /categories/bulk-delete                  bulk delete (POST)
/// /categories/bulk-toggle                  bulk activate/deactivate (POST)
/// /categories/reorder                      drag-and-drop placements (PUT)
/// /categories/export                       CSV download (GET)
/// /categories/import                       CSV upload (POST)
/// /categories/{id}                         get, update, delete
///
/// /category-templates                      list, create
/// /category-templates/{id}                 get, update, delete
/// /category-templates/{id}/apply           create the template's categories
///
/// /category-rules                          list (?category_id), create
/// /category-rules/{id}                     get, update, delete
///
/// /tags                                    list, create
/// /tags/bulk-delete                        bulk delete (POST)
/// /tags/{id}                               get, update, delete
///
/// /menus                                   list, create
/// /menus/location/{location}               get by location
/// /menus/{id}                              get, update, delete
///
/// /content-gap-analysis                    gaps (?min_posts, stale_days)
/// /content-gap-analysis/summary            counts by priority
///
/// /enhanced-seo/analyze                    analyze a draft (POST)
/// /enhanced-seo/posts/{id}                 analyze a stored post
///
/// /ai-categorization/suggest               suggest categories (POST)
/// /ai-categorization/apply                 link suggested categories (POST)
///
/// /analytics/page-views                    record a view (POST, public)
/// /analytics/traffic-sources               traffic by source (?days)
/// /analytics/real-time                     last five minutes
///
/// /notifications                           list, create (admin)
/// /notifications/unread-count              unread count
/// /notifications/read-all                  mark all read (PUT)
/// /notifications/{id}/read                 mark read (PUT)
///
/// /system/health                           latest metrics, record (admin)
/// /system/health/{metric}                  metric history
/// /system/security-events                  list, record (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/dashboard", dashboard::router())
        .nest("/posts", posts::router())
        .nest("/categories", categories::router())
        .nest("/category-templates", category_templates::router())
        .nest("/category-rules", category_rules::router())
        .nest("/tags", tags::router())
        .nest("/menus", menus::router())
        .nest("/content-gap-analysis", content_gap::router())
        .nest("/enhanced-seo", seo::router())
        .nest("/ai-categorization", categorization::router())
        .nest("/analytics", analytics::router())
        .nest("/notifications", notifications::router())
        .nest("/system", system::router())
}
