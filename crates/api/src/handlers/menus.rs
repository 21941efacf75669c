//! Handlers for the `/menus` resource.
//!
//! A menu is returned with its items as a tree. Updating with `items`
//! reconciles the stored items against the payload by id: known ids are
//! updated in place, new items are inserted and missing ones deleted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jacms_core::error::CoreError;
use jacms_core::menu::{plan_item_sync, validate_location};
use jacms_core::slug::validate_name;
use jacms_core::types::DbId;
use jacms_db::models::menu::{CreateMenu, Menu, MenuWithItems, UpdateMenu};
use jacms_db::repositories::{MenuRepo, MenuUpdate};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/menus
pub async fn list_menus(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Menu>>>> {
    let menus = MenuRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(menus)))
}

/// GET /api/menus/{id}
pub async fn get_menu(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MenuWithItems>>> {
    let menu = MenuRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Menu", id))?;
    Ok(Json(DataResponse::new(menu)))
}

/// GET /api/menus/location/{location}
pub async fn get_menu_by_location(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> AppResult<Json<DataResponse<MenuWithItems>>> {
    let found = MenuRepo::find_by_location(&state.pool, &location).await?;
    let menu = found.ok_or(AppError::Core(CoreError::NotFoundByKey {
        entity: "Menu",
        key: location,
    }))?;
    Ok(Json(DataResponse::new(menu)))
}

/// POST /api/menus
pub async fn create_menu(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateMenu>,
) -> AppResult<impl IntoResponse> {
    validate_name("name", &input.name)?;
    validate_location(&input.location)?;
    let plan = plan_item_sync(&[], &input.items)?;

    let id = MenuRepo::create(&state.pool, &input, &plan).await?;
    let menu = MenuRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Menu", id))?;

    tracing::info!(
        menu_id = id,
        items = plan.items.len(),
        user_id = auth.user_id,
        "Menu created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(menu))))
}

/// PUT /api/menus/{id}
///
/// Fields left out keep their value. When `items` is present the stored
/// items become exactly that tree; when absent they are untouched.
pub async fn update_menu(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMenu>,
) -> AppResult<Json<DataResponse<MenuWithItems>>> {
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    if let Some(location) = &input.location {
        validate_location(location)?;
    }

    let plan = match &input.items {
        Some(items) => {
            let existing = MenuRepo::item_ids(&state.pool, id).await?;
            Some(plan_item_sync(&existing, items)?)
        }
        None => None,
    };

    match MenuRepo::update(&state.pool, id, &input, plan.as_ref()).await? {
        MenuUpdate::Updated => {}
        MenuUpdate::NotFound => return Err(AppError::not_found("Menu", id)),
        MenuUpdate::ItemsChanged => {
            return Err(AppError::Core(CoreError::Conflict(
                "Menu items were changed by another update; reload the menu and retry".into(),
            )))
        }
    }

    let menu = MenuRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Menu", id))?;
    tracing::info!(
        menu_id = id,
        items_replaced = plan.is_some(),
        user_id = auth.user_id,
        "Menu updated"
    );
    Ok(Json(DataResponse::new(menu)))
}

/// DELETE /api/menus/{id}
pub async fn delete_menu(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !MenuRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Menu", id));
    }
    tracing::info!(menu_id = id, user_id = auth.user_id, "Menu deleted");
    Ok(StatusCode::NO_CONTENT)
}
