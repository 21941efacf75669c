//! Handlers for `/category-rules`: keyword rules that drive automatic
//! categorization.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jacms_core::categorization::{normalize_keywords, MatchField};
use jacms_core::error::CoreError;
use jacms_core::slug::validate_name;
use jacms_core::types::DbId;
use jacms_db::models::category_rule::{CategoryRule, CreateCategoryRule, UpdateCategoryRule};
use jacms_db::repositories::{CategoryRepo, CategoryRuleRepo, RuleWrite};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_WEIGHT: i32 = 1;
const MAX_WEIGHT: i32 = 100;

#[derive(Debug, Deserialize)]
pub struct RuleListParams {
    pub category_id: Option<DbId>,
}

/// GET /api/category-rules?category_id=
pub async fn list_rules(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<RuleListParams>,
) -> AppResult<Json<DataResponse<Vec<CategoryRule>>>> {
    let rules = CategoryRuleRepo::list(&state.pool, params.category_id).await?;
    Ok(Json(DataResponse::new(rules)))
}

/// GET /api/category-rules/{id}
pub async fn get_rule(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CategoryRule>>> {
    let rule = CategoryRuleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("CategoryRule", id))?;
    Ok(Json(DataResponse::new(rule)))
}

/// POST /api/category-rules
pub async fn create_rule(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryRule>,
) -> AppResult<impl IntoResponse> {
    validate_name("name", &input.name)?;
    let keywords = normalize_keywords(&input.keywords)?;
    let match_field = match input.match_field.as_deref() {
        Some(raw) => MatchField::parse(raw)?,
        None => MatchField::default(),
    };
    let weight = validate_weight(input.weight.unwrap_or(DEFAULT_WEIGHT))?;
    ensure_category(&state, input.category_id).await?;

    let write = RuleWrite {
        category_id: input.category_id,
        name: input.name.trim(),
        keywords: &keywords,
        match_field: match_field.as_str(),
        weight,
        is_active: input.is_active.unwrap_or(true),
    };
    let rule = CategoryRuleRepo::create(&state.pool, &write).await?;

    tracing::info!(
        rule_id = rule.id,
        category_id = rule.category_id,
        user_id = auth.user_id,
        "Category rule created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(rule))))
}

/// PUT /api/category-rules/{id}
///
/// Partial update; omitted fields keep their stored value.
pub async fn update_rule(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategoryRule>,
) -> AppResult<Json<DataResponse<CategoryRule>>> {
    let current = CategoryRuleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("CategoryRule", id))?;

    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    let keywords = match &input.keywords {
        Some(k) => normalize_keywords(k)?,
        None => current.keywords.clone(),
    };
    let match_field = match input.match_field.as_deref() {
        Some(raw) => MatchField::parse(raw)?.as_str(),
        None => current.match_field.as_str(),
    };
    let weight = validate_weight(input.weight.unwrap_or(current.weight))?;
    let category_id = input.category_id.unwrap_or(current.category_id);
    if category_id != current.category_id {
        ensure_category(&state, category_id).await?;
    }

    let write = RuleWrite {
        category_id,
        name: input.name.as_deref().map_or(current.name.as_str(), str::trim),
        keywords: &keywords,
        match_field,
        weight,
        is_active: input.is_active.unwrap_or(current.is_active),
    };
    let rule = CategoryRuleRepo::update(&state.pool, id, &write)
        .await?
        .ok_or_else(|| AppError::not_found("CategoryRule", id))?;

    tracing::info!(rule_id = id, user_id = auth.user_id, "Category rule updated");
    Ok(Json(DataResponse::new(rule)))
}

/// DELETE /api/category-rules/{id}
pub async fn delete_rule(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CategoryRuleRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("CategoryRule", id));
    }
    tracing::info!(rule_id = id, user_id = auth.user_id, "Category rule deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn validate_weight(weight: i32) -> Result<i32, CoreError> {
    if !(1..=MAX_WEIGHT).contains(&weight) {
        return Err(CoreError::validation(format!(
            "weight must be between 1 and {MAX_WEIGHT}"
        )));
    }
    Ok(weight)
}

async fn ensure_category(state: &AppState, id: DbId) -> AppResult<()> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Category", id))?;
    Ok(())
}
