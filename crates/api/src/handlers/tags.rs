//! Handlers for the `/tags` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jacms_core::bulk::BulkResult;
use jacms_core::slug::{slug_or_generate, validate_color, validate_name, validate_slug};
use jacms_core::types::DbId;
use jacms_db::models::page::Page;
use jacms_db::models::tag::{CreateTag, Tag, TagListParams, TagWithCount, UpdateTag};
use jacms_db::repositories::TagRepo;
use serde::Deserialize;

use super::require_ids;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BulkDeleteTags {
    pub ids: Vec<DbId>,
}

/// GET /api/tags?search=&sort=&limit=&offset=
pub async fn list_tags(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TagListParams>,
) -> AppResult<Json<DataResponse<Page<TagWithCount>>>> {
    let page = TagRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/tags/{id}
pub async fn get_tag(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TagWithCount>>> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Tag", id))?;
    Ok(Json(DataResponse::new(tag)))
}

/// POST /api/tags
pub async fn create_tag(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    validate_name("name", &input.name)?;
    validate_color(input.color.as_deref())?;
    let slug = slug_or_generate(input.slug.as_deref(), &input.name);
    validate_slug(&slug)?;

    let tag = TagRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(tag_id = tag.id, user_id = auth.user_id, "Tag created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(tag))))
}

/// PUT /api/tags/{id}
pub async fn update_tag(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateTag>,
) -> AppResult<Json<DataResponse<Tag>>> {
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    if let Some(slug) = &input.slug {
        let slug = slug.trim().to_string();
        validate_slug(&slug)?;
        input.slug = Some(slug);
    }
    validate_color(input.color.as_deref())?;

    let tag = TagRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Tag", id))?;
    tracing::info!(tag_id = id, user_id = auth.user_id, "Tag updated");
    Ok(Json(DataResponse::new(tag)))
}

/// DELETE /api/tags/{id}
pub async fn delete_tag(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TagRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Tag", id));
    }
    tracing::info!(tag_id = id, user_id = auth.user_id, "Tag deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/tags/bulk-delete
pub async fn bulk_delete_tags(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkDeleteTags>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    require_ids(&input.ids)?;
    let result = TagRepo::bulk_delete(&state.pool, &input.ids).await?;
    tracing::info!(
        user_id = auth.user_id,
        succeeded = result.success_count,
        failed = result.failure_count,
        "Bulk tag delete"
    );
    Ok(Json(DataResponse::new(result)))
}
