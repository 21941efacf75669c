//! Handlers for `/ai-categorization`: keyword-rule category suggestions.
//!
//! Scoring is done by [`jacms_core::categorization::suggest_categories`]
//! over the active rules of active categories.

use axum::extract::State;
use axum::Json;
use jacms_core::categorization::{
    select_for_apply, suggest_categories, CategorySuggestion, KeywordRule, MatchField,
    DEFAULT_APPLY_THRESHOLD, DEFAULT_MIN_APPLY_SCORE,
};
use jacms_core::error::CoreError;
use jacms_core::types::DbId;
use jacms_db::models::category_rule::CategoryRule;
use jacms_db::repositories::{CategoryRuleRepo, PostRepo};
use serde::{Deserialize, Serialize};

use super::posts::load_editable;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Either a stored post or an ad-hoc title/content pair.
#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub post_id: Option<DbId>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Confidence is relative to the best-scoring category, so the top
/// suggestion always reaches any threshold. `min_score` is the absolute
/// floor that keeps a single weak hit from being applied.
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub post_id: DbId,
    /// Minimum confidence in `[0, 1]`.
    pub threshold: Option<f64>,
    /// Minimum score; defaults to [`DEFAULT_MIN_APPLY_SCORE`].
    pub min_score: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub post_id: DbId,
    pub threshold: f64,
    pub min_score: u64,
    pub applied: Vec<CategorySuggestion>,
    /// Links that did not exist before.
    pub added: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/ai-categorization/suggest
pub async fn suggest(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SuggestRequest>,
) -> AppResult<Json<DataResponse<Vec<CategorySuggestion>>>> {
    let (title, content) = match input.post_id {
        Some(post_id) => {
            let post = PostRepo::find_by_id(&state.pool, post_id)
                .await?
                .ok_or_else(|| AppError::not_found("Post", post_id))?;
            (post.title, post.content)
        }
        None => {
            let title = input.title.unwrap_or_default();
            let content = input.content.unwrap_or_default();
            if title.trim().is_empty() && content.trim().is_empty() {
                return Err(CoreError::validation(
                    "Provide post_id, or a title and/or content to analyze",
                )
                .into());
            }
            (title, content)
        }
    };

    let rules = load_rules(&state).await?;
    let suggestions = suggest_categories(&title, &content, &rules);
    Ok(Json(DataResponse::new(suggestions)))
}

/// POST /api/ai-categorization/apply
///
/// Link the post to every suggested category at or above both `threshold`
/// and `min_score`. Existing links are kept.
pub async fn apply(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ApplyRequest>,
) -> AppResult<Json<DataResponse<ApplyResponse>>> {
    let threshold = input.threshold.unwrap_or(DEFAULT_APPLY_THRESHOLD);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(CoreError::validation("threshold must be between 0 and 1").into());
    }
    let min_score = input.min_score.unwrap_or(DEFAULT_MIN_APPLY_SCORE);

    let post = load_editable(&state, &auth, input.post_id).await?;
    let rules = load_rules(&state).await?;

    let applied = select_for_apply(
        suggest_categories(&post.title, &post.content, &rules),
        threshold,
        min_score,
    );
    let ids: Vec<DbId> = applied.iter().map(|s| s.category_id).collect();

    let added = if ids.is_empty() {
        0
    } else {
        PostRepo::add_categories(&state.pool, post.id, &ids).await?
    };

    tracing::info!(
        post_id = post.id,
        suggested = applied.len(),
        added,
        user_id = auth.user_id,
        "Suggested categories applied"
    );
    Ok(Json(DataResponse::new(ApplyResponse {
        post_id: post.id,
        threshold,
        min_score,
        applied,
        added,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_rules(state: &AppState) -> AppResult<Vec<KeywordRule>> {
    let rows = CategoryRuleRepo::list_active(&state.pool).await?;
    Ok(rows.into_iter().filter_map(to_keyword_rule).collect())
}

/// Rows with an unknown match field are skipped rather than failing the
/// whole request.
fn to_keyword_rule(row: CategoryRule) -> Option<KeywordRule> {
    let match_field = match MatchField::parse(&row.match_field) {
        Ok(field) => field,
        Err(_) => {
            tracing::warn!(rule_id = row.id, match_field = %row.match_field, "Skipping rule");
            return None;
        }
    };
    Some(KeywordRule {
        category_id: row.category_id,
        keywords: row.keywords,
        match_field,
        weight: u32::try_from(row.weight).unwrap_or(0),
    })
}
