//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and answers 403 when the role is not
//! allowed.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jacms_core::error::CoreError;
use jacms_core::roles::{can_manage_structure, ROLE_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `editor` or `admin`. Guards changes to shared site structure:
/// categories, tags, menus, templates and categorization rules.
pub struct RequireEditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_manage_structure(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Editor or Admin role required".into(),
            )));
        }
        Ok(RequireEditor(user))
    }
}
