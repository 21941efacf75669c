//! Menu item tree validation and keyed reconciliation planning.
//!
//! A menu update carries the complete desired item tree. Instead of
//! deleting every stored item and recreating the tree, the planner matches
//! payload items to stored rows by `id`: matched rows are updated in place,
//! id-less items are inserted and stored rows missing from the payload are
//! deleted. The resulting item set equals the payload exactly while the ids
//! of surviving items stay stable.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum nesting depth of a menu tree (top level is depth 1).
pub const MAX_MENU_DEPTH: usize = 5;

pub const TARGET_SELF: &str = "_self";
pub const TARGET_BLANK: &str = "_blank";

/// Valid link targets.
pub const VALID_TARGETS: &[&str] = &[TARGET_SELF, TARGET_BLANK];

/// One node of the desired menu tree as sent by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemInput {
    /// Id of an existing item of this menu; `None` for a new item.
    pub id: Option<DbId>,
    pub label: String,
    pub url: String,
    pub target: Option<String>,
    pub icon: Option<String>,
    pub css_class: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub children: Vec<MenuItemInput>,
}

/// A tree node flattened into write order (parents before children).
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMenuItem {
    /// Position in [`MenuSyncPlan::items`].
    pub index: usize,
    /// Index of the parent in [`MenuSyncPlan::items`], if nested.
    pub parent_index: Option<usize>,
    /// Stored row to update, or `None` to insert.
    pub existing_id: Option<DbId>,
    /// Position among siblings (0-based).
    pub sort_order: i32,
    pub depth: usize,
    pub label: String,
    pub url: String,
    pub target: String,
    pub icon: Option<String>,
    pub css_class: Option<String>,
    pub is_active: bool,
}

/// The writes needed to make the stored items match a payload tree.
///
/// Apply `items` in order first, then delete `delete_ids`; deleting last
/// keeps stored children that were moved out of a removed parent from being
/// cascaded away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuSyncPlan {
    pub items: Vec<PlannedMenuItem>,
    pub delete_ids: Vec<DbId>,
}

impl MenuSyncPlan {
    pub fn update_count(&self) -> usize {
        self.items.iter().filter(|i| i.existing_id.is_some()).count()
    }

    pub fn insert_count(&self) -> usize {
        self.items.iter().filter(|i| i.existing_id.is_none()).count()
    }

    /// The stored item ids this plan was built against, sorted. Every one
    /// is either updated or deleted by the plan.
    pub fn base_ids(&self) -> Vec<DbId> {
        let mut ids: Vec<DbId> = self
            .items
            .iter()
            .filter_map(|i| i.existing_id)
            .chain(self.delete_ids.iter().copied())
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Validate a menu location key (lowercase identifier such as `header`).
pub fn validate_location(location: &str) -> Result<(), CoreError> {
    if location.is_empty()
        || !location
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(CoreError::validation(format!(
            "Invalid menu location '{location}'. Use lowercase letters, digits, '-' or '_'"
        )));
    }
    Ok(())
}

/// Build the reconciliation plan for a menu whose stored item ids are
/// `existing_ids`.
///
/// Fails if an item is invalid, an id is not one of `existing_ids`, an id
/// appears twice or the tree is deeper than [`MAX_MENU_DEPTH`].
pub fn plan_item_sync(
    existing_ids: &[DbId],
    items: &[MenuItemInput],
) -> Result<MenuSyncPlan, CoreError> {
    let existing: HashSet<DbId> = existing_ids.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut plan = MenuSyncPlan::default();

    flatten(items, None, 1, &existing, &mut seen, &mut plan.items)?;

    plan.delete_ids = existing_ids
        .iter()
        .copied()
        .filter(|id| !seen.contains(id))
        .collect();

    Ok(plan)
}

fn flatten(
    siblings: &[MenuItemInput],
    parent_index: Option<usize>,
    depth: usize,
    existing: &HashSet<DbId>,
    seen: &mut HashSet<DbId>,
    out: &mut Vec<PlannedMenuItem>,
) -> Result<(), CoreError> {
    if depth > MAX_MENU_DEPTH && !siblings.is_empty() {
        return Err(CoreError::validation(format!(
            "Menu items may be nested at most {MAX_MENU_DEPTH} levels deep"
        )));
    }

    for (position, item) in siblings.iter().enumerate() {
        validate_item(item)?;

        if let Some(id) = item.id {
            if !existing.contains(&id) {
                return Err(CoreError::validation(format!(
                    "Menu item {id} does not belong to this menu"
                )));
            }
            if !seen.insert(id) {
                return Err(CoreError::validation(format!(
                    "Menu item {id} appears more than once"
                )));
            }
        }

        let index = out.len();
        out.push(PlannedMenuItem {
            index,
            parent_index,
            existing_id: item.id,
            sort_order: position as i32,
            depth,
            label: item.label.trim().to_string(),
            url: item.url.trim().to_string(),
            target: item
                .target
                .clone()
                .unwrap_or_else(|| TARGET_SELF.to_string()),
            icon: item.icon.clone(),
            css_class: item.css_class.clone(),
            is_active: item.is_active.unwrap_or(true),
        });

        flatten(&item.children, Some(index), depth + 1, existing, seen, out)?;
    }

    Ok(())
}

fn validate_item(item: &MenuItemInput) -> Result<(), CoreError> {
    if item.label.trim().is_empty() {
        return Err(CoreError::validation("Menu item label must not be empty"));
    }
    if item.url.trim().is_empty() {
        return Err(CoreError::validation(format!(
            "Menu item '{}' must have a url",
            item.label
        )));
    }
    if let Some(target) = item.target.as_deref() {
        if !VALID_TARGETS.contains(&target) {
            return Err(CoreError::validation(format!(
                "Invalid target '{target}'. Must be one of: {}",
                VALID_TARGETS.join(", ")
            )));
        }
    }
    Ok(())
}
