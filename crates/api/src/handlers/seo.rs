//! Handlers for `/enhanced-seo`.

use axum::extract::{Path, State};
use axum::Json;
use jacms_core::error::CoreError;
use jacms_core::seo::{analyze, SeoInput, SeoReport};
use jacms_core::types::DbId;
use jacms_db::repositories::PostRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/enhanced-seo/analyze
///
/// Analyze an unsaved draft.
pub async fn analyze_content(
    _auth: AuthUser,
    Json(input): Json<SeoInput>,
) -> AppResult<Json<DataResponse<SeoReport>>> {
    if input.title.trim().is_empty() {
        return Err(CoreError::validation("title must not be empty").into());
    }
    Ok(Json(DataResponse::new(analyze(&input))))
}

/// GET /api/enhanced-seo/posts/{id}
pub async fn analyze_post(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SeoReport>>> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Post", id))?;

    let input = SeoInput {
        title: post.title,
        slug: post.slug,
        meta_title: post.meta_title,
        meta_description: post.meta_description,
        focus_keyword: post.focus_keyword,
        content: post.content,
    };
    Ok(Json(DataResponse::new(analyze(&input))))
}
