//! Handlers for the `/categories` resource.
//!
//! Reads need any authenticated user; every write needs `editor` or
//! `admin`. Bulk endpoints report per-item outcomes in a [`BulkResult`]
//! and honor the requested [`jacms_core::bulk::BulkMode`].

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jacms_core::bulk::BulkResult;
use jacms_core::category_csv::{build_category_csv, parse_category_csv};
use jacms_core::error::CoreError;
use jacms_core::hierarchy::{validate_reorder, HierarchyMove, TreeNode};
use jacms_core::slug::{slug_or_generate, validate_color, validate_name, validate_slug};
use jacms_core::types::DbId;
use jacms_db::models::category::{
    BulkDeleteCategories, BulkToggleCategories, Category, CategoryImportReport,
    CategoryListParams, CategoryWithCounts, CreateCategory, ReorderCategories, UpdateCategory,
};
use jacms_db::models::page::Page;
use jacms_db::repositories::{CategoryRepo, DeleteRefusal};

use super::require_ids;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/categories?search=&parent_id=&root_only=&is_active=&limit=&offset=
pub async fn list_categories(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CategoryListParams>,
) -> AppResult<Json<DataResponse<Page<CategoryWithCounts>>>> {
    let page = CategoryRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/categories/tree
pub async fn category_tree(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TreeNode<CategoryWithCounts>>>>> {
    let tree = CategoryRepo::tree(&state.pool).await?;
    Ok(Json(DataResponse::new(tree)))
}

/// GET /api/categories/{id}
pub async fn get_category(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CategoryWithCounts>>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Category", id))?;
    Ok(Json(DataResponse::new(category)))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/categories
pub async fn create_category(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    validate_name("name", &input.name)?;
    validate_color(input.color.as_deref())?;
    let slug = slug_or_generate(input.slug.as_deref(), &input.name);
    validate_slug(&slug)?;
    if let Some(parent_id) = input.parent_id {
        ensure_exists(&state, parent_id).await?;
    }

    let category = CategoryRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(category_id = category.id, user_id = auth.user_id, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(category))))
}

/// PUT /api/categories/{id}
///
/// Partial update. `"parent_id": null` moves the category to the top level;
/// a new parent is checked for existence and cycles.
pub async fn update_category(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    let current = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Category", id))?;

    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    if let Some(slug) = &input.slug {
        let slug = slug.trim().to_string();
        validate_slug(&slug)?;
        input.slug = Some(slug);
    }
    validate_color(input.color.as_deref())?;

    if let Some(Some(parent_id)) = input.parent_id {
        let pairs = CategoryRepo::parent_pairs(&state.pool).await?;
        let placement = HierarchyMove {
            id,
            parent_id: Some(parent_id),
            sort_order: input.sort_order.unwrap_or(current.sort_order),
        };
        validate_reorder(&pairs, &[placement])?;
    }

    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Category", id))?;
    tracing::info!(category_id = id, user_id = auth.user_id, "Category updated");
    Ok(Json(DataResponse::new(category)))
}

/// DELETE /api/categories/{id}
///
/// Refuses with 409 while the category has posts or subcategories.
pub async fn delete_category(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    match CategoryRepo::delete_if_empty(&state.pool, id).await? {
        Ok(()) => {}
        Err(DeleteRefusal::NotFound) => return Err(AppError::not_found("Category", id)),
        Err(refusal) => return Err(AppError::Core(CoreError::Conflict(refusal.to_string()))),
    }
    tracing::info!(category_id = id, user_id = auth.user_id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Bulk and hierarchy
// ---------------------------------------------------------------------------

/// POST /api/categories/bulk-delete
pub async fn bulk_delete_categories(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkDeleteCategories>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    require_ids(&input.ids)?;
    let result = CategoryRepo::bulk_delete_categories(&state.pool, &input.ids, input.mode).await?;
    tracing::info!(
        user_id = auth.user_id,
        mode = ?input.mode,
        succeeded = result.success_count,
        failed = result.failure_count,
        rolled_back = result.rolled_back,
        "Bulk category delete"
    );
    Ok(Json(DataResponse::new(result)))
}

/// POST /api/categories/bulk-toggle
pub async fn bulk_toggle_categories(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkToggleCategories>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    require_ids(&input.ids)?;
    let result =
        CategoryRepo::bulk_toggle_categories(&state.pool, &input.ids, input.is_active, input.mode)
            .await?;
    tracing::info!(
        user_id = auth.user_id,
        is_active = input.is_active,
        succeeded = result.success_count,
        failed = result.failure_count,
        "Bulk category toggle"
    );
    Ok(Json(DataResponse::new(result)))
}

/// PUT /api/categories/reorder
///
/// Apply drag-and-drop placements atomically after checking every id
/// exists and the result is acyclic.
pub async fn reorder_categories(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<ReorderCategories>,
) -> AppResult<Json<DataResponse<Vec<TreeNode<CategoryWithCounts>>>>> {
    if input.moves.is_empty() {
        return Err(CoreError::validation("moves must not be empty").into());
    }
    let pairs = CategoryRepo::parent_pairs(&state.pool).await?;
    validate_reorder(&pairs, &input.moves)?;

    CategoryRepo::reorder(&state.pool, &input.moves).await?;
    tracing::info!(user_id = auth.user_id, moves = input.moves.len(), "Categories reordered");

    let tree = CategoryRepo::tree(&state.pool).await?;
    Ok(Json(DataResponse::new(tree)))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// GET /api/categories/export
///
/// Every category as a `text/csv` attachment.
pub async fn export_to_csv(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = CategoryRepo::export_rows(&state.pool).await?;
    let csv = build_category_csv(&rows);
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"categories.csv\""),
        ],
        csv,
    ))
}

/// POST /api/categories/import
///
/// The raw request body is the CSV text. Rows upsert by slug; bad rows are
/// reported by line number and skipped.
pub async fn import_from_csv(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<DataResponse<CategoryImportReport>>> {
    let text = std::str::from_utf8(&body)
        .map_err(|_| AppError::BadRequest("CSV body must be UTF-8 text".into()))?;
    let parsed = parse_category_csv(text)?;

    let report = CategoryRepo::import_rows(&state.pool, parsed).await?;
    tracing::info!(
        user_id = auth.user_id,
        created = report.created,
        updated = report.updated,
        errors = report.errors.len(),
        "Categories imported"
    );
    Ok(Json(DataResponse::new(report)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Category", id))?;
    Ok(())
}
