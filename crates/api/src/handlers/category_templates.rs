//! Handlers for `/category-templates`: reusable category sets that can be
//! applied to create their categories in one call.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jacms_core::error::CoreError;
use jacms_core::slug::validate_name;
use jacms_core::types::DbId;
use jacms_db::models::category_template::{
    ApplyTemplateReport, CategoryTemplate, CreateCategoryTemplate, TemplateCategory,
    UpdateCategoryTemplate,
};
use jacms_db::repositories::CategoryTemplateRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/category-templates
pub async fn list_templates(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CategoryTemplate>>>> {
    let templates = CategoryTemplateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(templates)))
}

/// GET /api/category-templates/{id}
pub async fn get_template(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CategoryTemplate>>> {
    let template = CategoryTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("CategoryTemplate", id))?;
    Ok(Json(DataResponse::new(template)))
}

/// POST /api/category-templates
pub async fn create_template(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryTemplate>,
) -> AppResult<impl IntoResponse> {
    validate_name("name", &input.name)?;
    validate_entries(&input.categories)?;

    let template = CategoryTemplateRepo::create(&state.pool, &input).await?;
    tracing::info!(template_id = template.id, user_id = auth.user_id, "Category template created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(template))))
}

/// PUT /api/category-templates/{id}
pub async fn update_template(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategoryTemplate>,
) -> AppResult<Json<DataResponse<CategoryTemplate>>> {
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    if let Some(categories) = &input.categories {
        validate_entries(categories)?;
    }

    let template = CategoryTemplateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("CategoryTemplate", id))?;
    tracing::info!(template_id = id, user_id = auth.user_id, "Category template updated");
    Ok(Json(DataResponse::new(template)))
}

/// DELETE /api/category-templates/{id}
pub async fn delete_template(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CategoryTemplateRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("CategoryTemplate", id));
    }
    tracing::info!(template_id = id, user_id = auth.user_id, "Category template deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/category-templates/{id}/apply
///
/// Create the template's categories. Entries whose slug already exists are
/// skipped and listed in the report.
pub async fn apply_template(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ApplyTemplateReport>>> {
    let template = CategoryTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("CategoryTemplate", id))?;

    let entries: Vec<TemplateCategory> = serde_json::from_value(template.categories)
        .map_err(|e| AppError::InternalError(format!("Stored template {id} is malformed: {e}")))?;

    let report = CategoryTemplateRepo::apply(&state.pool, &entries).await?;
    tracing::info!(
        template_id = id,
        created = report.created.len(),
        skipped = report.skipped.len(),
        user_id = auth.user_id,
        "Category template applied"
    );
    Ok(Json(DataResponse::new(report)))
}

fn validate_entries(entries: &[TemplateCategory]) -> Result<(), CoreError> {
    if entries.is_empty() {
        return Err(CoreError::validation("categories must not be empty"));
    }
    for entry in entries {
        validate_name("category name", &entry.name)?;
    }
    Ok(())
}
