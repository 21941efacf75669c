//! Parent/child hierarchies: forest building and reorder validation.
//!
//! Categories and menu items are stored flat with a nullable `parent_id`.
//! [`build_forest`] nests them for API responses; [`validate_reorder`]
//! checks a drag-and-drop move set before it is written.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// A node with its nested children.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

/// Nest flat rows into a forest.
///
/// Input order is preserved among siblings, so callers sort by
/// `sort_order` beforehand. Rows whose parent is not in the input become
/// roots.
pub fn build_forest<T>(
    rows: Vec<T>,
    id_of: impl Fn(&T) -> DbId,
    parent_of: impl Fn(&T) -> Option<DbId>,
) -> Vec<TreeNode<T>> {
    let ids: HashSet<DbId> = rows.iter().map(&id_of).collect();
    let mut children_of: HashMap<DbId, Vec<T>> = HashMap::new();
    let mut roots = Vec::new();

    for row in rows {
        match parent_of(&row) {
            Some(pid) if ids.contains(&pid) && pid != id_of(&row) => {
                children_of.entry(pid).or_default().push(row)
            }
            _ => roots.push(row),
        }
    }

    fn attach<T>(
        row: T,
        id_of: &impl Fn(&T) -> DbId,
        children_of: &mut HashMap<DbId, Vec<T>>,
    ) -> TreeNode<T> {
        let kids = children_of.remove(&id_of(&row)).unwrap_or_default();
        TreeNode {
            item: row,
            children: kids
                .into_iter()
                .map(|k| attach(k, id_of, children_of))
                .collect(),
        }
    }

    roots
        .into_iter()
        .map(|r| attach(r, &id_of, &mut children_of))
        .collect()
}

/// One drag-and-drop placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct HierarchyMove {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub sort_order: i32,
}

/// Validate a move set against the current `(id, parent_id)` pairs.
///
/// Every moved id and every target parent must exist, an id may move only
/// once, and the hierarchy after applying all moves must be acyclic.
pub fn validate_reorder(
    current: &[(DbId, Option<DbId>)],
    moves: &[HierarchyMove],
) -> Result<(), CoreError> {
    let mut parents: HashMap<DbId, Option<DbId>> = current.iter().copied().collect();
    let mut moved = HashSet::with_capacity(moves.len());

    for m in moves {
        if !parents.contains_key(&m.id) {
            return Err(CoreError::NotFound {
                entity: "Category",
                id: m.id,
            });
        }
        if !moved.insert(m.id) {
            return Err(CoreError::validation(format!(
                "Category {} is moved more than once",
                m.id
            )));
        }
        if let Some(pid) = m.parent_id {
            if pid == m.id {
                return Err(CoreError::validation(format!(
                    "Category {} cannot be its own parent",
                    m.id
                )));
            }
            if !parents.contains_key(&pid) {
                return Err(CoreError::NotFound {
                    entity: "Category",
                    id: pid,
                });
            }
        }
        if m.sort_order < 0 {
            return Err(CoreError::validation("sort_order must not be negative"));
        }
    }

    for m in moves {
        parents.insert(m.id, m.parent_id);
    }

    if let Some(id) = find_cycle(&parents) {
        return Err(CoreError::validation(format!(
            "Move would create a cycle through category {id}"
        )));
    }

    Ok(())
}

/// Return a node that lies on a parent cycle, if any.
pub fn find_cycle(parents: &HashMap<DbId, Option<DbId>>) -> Option<DbId> {
    let mut acyclic: HashSet<DbId> = HashSet::new();

    for &start in parents.keys() {
        let mut path = HashSet::new();
        let mut node = Some(start);

        while let Some(id) = node {
            if acyclic.contains(&id) {
                break;
            }
            if !path.insert(id) {
                return Some(id);
            }
            node = parents.get(&id).copied().flatten();
        }

        acyclic.extend(path);
    }

    None
}
