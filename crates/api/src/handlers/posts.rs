//! Handlers for the `/posts` resource.
//!
//! Any authenticated user may write posts. Changing or deleting someone
//! else's post requires `editor` or `admin`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use jacms_core::error::CoreError;
use jacms_core::post::{resolve_published_at, validate_schedule, validate_title, PostStatus};
use jacms_core::roles::can_manage_structure;
use jacms_core::slug::{slug_or_generate, validate_slug};
use jacms_core::types::DbId;
use jacms_db::models::page::Page;
use jacms_db::models::post::{CreatePost, Post, PostListParams, PostWithRelations, PostWrite, UpdatePost};
use jacms_db::repositories::PostRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/posts?status=&category_id=&tag_id=&author_id=&search=&limit=&offset=
pub async fn list_posts(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> AppResult<Json<DataResponse<Page<Post>>>> {
    let page = PostRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PostWithRelations>>> {
    let post = PostRepo::find_with_relations(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Post", id))?;
    Ok(Json(DataResponse::new(post)))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/posts
///
/// The caller becomes the author. Slug defaults to one derived from the
/// title and status defaults to `DRAFT`.
pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePost>,
) -> AppResult<impl IntoResponse> {
    let write = resolve_write(&input, None)?;
    let created = PostRepo::create(
        &state.pool,
        &write,
        auth.user_id,
        &input.category_ids,
        &input.tag_ids,
    )
    .await?;

    tracing::info!(
        post_id = created.post.id,
        status = write.status.as_str(),
        user_id = auth.user_id,
        "Post created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

/// PUT /api/posts/{id}
///
/// Full update: the body is the complete post, including its category and
/// tag sets (omitted sets become empty).
pub async fn update_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePost>,
) -> AppResult<Json<DataResponse<PostWithRelations>>> {
    let existing = load_editable(&state, &auth, id).await?;
    let write = resolve_write(&input, Some(&existing))?;

    let updated = PostRepo::update(
        &state.pool,
        id,
        &write,
        Some(input.category_ids.as_slice()),
        Some(input.tag_ids.as_slice()),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Post", id))?;

    tracing::info!(post_id = id, user_id = auth.user_id, "Post updated");
    Ok(Json(DataResponse::new(updated)))
}

/// PATCH /api/posts/{id}
///
/// Quick edit: only supplied fields change. `category_ids`/`tag_ids`
/// replace their association set when present.
pub async fn quick_edit_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePost>,
) -> AppResult<Json<DataResponse<PostWithRelations>>> {
    let existing = load_editable(&state, &auth, id).await?;

    let mut write = PostWrite::merged(&existing, &input);
    let schedule_changed = input.status.is_some() || input.scheduled_at.is_some();
    validate_write(&write, schedule_changed)?;
    write.published_at = resolve_published_at(write.status, existing.published_at, Utc::now());

    let updated = PostRepo::update(
        &state.pool,
        id,
        &write,
        input.category_ids.as_deref(),
        input.tag_ids.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Post", id))?;

    tracing::info!(post_id = id, user_id = auth.user_id, "Post quick-edited");
    Ok(Json(DataResponse::new(updated)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_editable(&state, &auth, id).await?;
    if !PostRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Post", id));
    }
    tracing::info!(post_id = id, user_id = auth.user_id, "Post deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a post the caller may modify: their own, or any post for editors
/// and admins.
pub(crate) async fn load_editable(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<Post> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Post", id))?;

    if post.author_id != Some(auth.user_id) && !can_manage_structure(&auth.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author, an editor or an admin may modify this post".into(),
        )));
    }
    Ok(post)
}

/// Turn a full post body into column values. `existing` supplies the stored
/// `published_at` on update.
fn resolve_write(input: &CreatePost, existing: Option<&Post>) -> Result<PostWrite, CoreError> {
    let status = input.status.unwrap_or(PostStatus::Draft);
    let now = Utc::now();

    let write = PostWrite {
        title: input.title.trim().to_string(),
        slug: slug_or_generate(input.slug.as_deref(), &input.title),
        excerpt: input.excerpt.clone(),
        content: input.content.clone(),
        featured_image: input.featured_image.clone(),
        status,
        meta_title: input.meta_title.clone(),
        meta_description: input.meta_description.clone(),
        focus_keyword: input.focus_keyword.clone(),
        published_at: resolve_published_at(status, existing.and_then(|p| p.published_at), now),
        scheduled_at: input.scheduled_at,
    };
    validate_write(&write, true)?;
    Ok(write)
}

/// Quick edits that touch neither status nor schedule skip the schedule
/// check, so an overdue scheduled post can still be retitled.
fn validate_write(write: &PostWrite, check_schedule: bool) -> Result<(), CoreError> {
    validate_title(&write.title)?;
    validate_slug(&write.slug)?;
    if check_schedule {
        validate_schedule(write.status, write.scheduled_at, Utc::now())?;
    }
    Ok(())
}
