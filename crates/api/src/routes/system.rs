//! Route definitions for system health and security events.

use axum::routing::get;
use axum::Router;

use crate::handlers::system;
use crate::state::AppState;

/// Routes mounted at `/system`.
///
/// ```text
/// GET  /health              -> health_overview
/// POST /health              -> record_metric (admin only)
/// GET  /health/{metric}     -> metric_history (?limit)
/// GET  /security-events     -> list_security_events (admin only)
/// POST /security-events     -> record_security_event (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/health",
            get(system::health_overview).post(system::record_metric),
        )
        .route("/health/{metric}", get(system::metric_history))
        .route(
            "/security-events",
            get(system::list_security_events).post(system::record_security_event),
        )
}
