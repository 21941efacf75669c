//! Handlers for `/notifications`.
//!
//! Users only ever see and mark their own notifications. Creating one for
//! another user is an admin action.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jacms_core::error::CoreError;
use jacms_core::types::DbId;
use jacms_db::models::notification::{
    CreateNotification, Notification, NotificationListParams, NOTIFICATION_KINDS,
};
use jacms_db::models::page::Page;
use jacms_db::repositories::{NotificationRepo, UserRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{AffectedRows, DataResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

/// GET /api/notifications?unread_only=&limit=&offset=
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationListParams>,
) -> AppResult<Json<DataResponse<Page<Notification>>>> {
    let page = NotificationRepo::list_for_user(&state.pool, auth.user_id, &params).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let unread = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(UnreadCount { unread })))
}

/// PUT /api/notifications/{id}/read
///
/// Another user's notification reads as not found.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let notification = NotificationRepo::mark_read(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Notification", id))?;
    Ok(Json(DataResponse::new(notification)))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AffectedRows>>> {
    let affected = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    tracing::debug!(user_id = auth.user_id, affected, "Notifications marked read");
    Ok(Json(DataResponse::new(AffectedRows { affected })))
}

/// POST /api/notifications
pub async fn create_notification(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateNotification>,
) -> AppResult<impl IntoResponse> {
    let kind = input.kind.as_deref().unwrap_or("info");
    if !NOTIFICATION_KINDS.contains(&kind) {
        return Err(CoreError::validation(format!(
            "Invalid kind '{kind}'. Must be one of: {}",
            NOTIFICATION_KINDS.join(", ")
        ))
        .into());
    }
    if input.title.trim().is_empty() {
        return Err(CoreError::validation("title must not be empty").into());
    }
    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", input.user_id))?;

    let notification = NotificationRepo::create(&state.pool, &input, kind).await?;
    tracing::info!(
        notification_id = notification.id,
        recipient_id = input.user_id,
        user_id = admin.user_id,
        "Notification created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(notification))))
}
