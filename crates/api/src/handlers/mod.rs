//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers validate input with `jacms_core`, delegate persistence to the
//! repositories in `jacms_db` and map errors via [`crate::error::AppError`].

pub mod analytics;
pub mod auth;
pub mod categories;
pub mod categorization;
pub mod category_rules;
pub mod category_templates;
pub mod content_gap;
pub mod dashboard;
pub mod menus;
pub mod notifications;
pub mod posts;
pub mod seo;
pub mod system;
pub mod tags;

use jacms_core::error::CoreError;
use jacms_core::types::DbId;

/// Largest id list a single bulk request may carry.
pub const MAX_BULK_IDS: usize = 500;

/// Reject empty or oversized bulk id lists.
pub(crate) fn require_ids(ids: &[DbId]) -> Result<(), CoreError> {
    if ids.is_empty() {
        return Err(CoreError::validation("ids must not be empty"));
    }
    if ids.len() > MAX_BULK_IDS {
        return Err(CoreError::validation(format!(
            "At most {MAX_BULK_IDS} ids may be sent in one request"
        )));
    }
    Ok(())
}
