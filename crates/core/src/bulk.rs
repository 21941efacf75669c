//! Accumulator and transaction-mode types for bulk operations.
//!
//! Bulk endpoints never abort on the first failing item. Each item is
//! recorded as a success or a failure with a reason, and the caller picks
//! whether items commit independently or as one unit.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// How a bulk operation commits its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkMode {
    /// Each item runs in its own transaction. Failures do not affect
    /// other items.
    #[default]
    PerItem,
    /// The whole batch runs in one transaction, rolled back if any item fails.
    AllOrNothing,
}

/// A single failed item in a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub id: DbId,
    pub reason: String,
}

/// Per-item outcome summary returned by every bulk endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkResult {
    pub success_count: usize,
    pub failure_count: usize,
    pub succeeded: Vec<DbId>,
    pub failures: Vec<BulkFailure>,
    /// `true` when an all-or-nothing batch was rolled back.
    pub rolled_back: bool,
}

impl BulkResult {
    pub fn record_success(&mut self, id: DbId) {
        self.success_count += 1;
        self.succeeded.push(id);
    }

    pub fn record_failure(&mut self, id: DbId, reason: impl Into<String>) {
        self.failure_count += 1;
        self.failures.push(BulkFailure {
            id,
            reason: reason.into(),
        });
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }

    /// Convert the tentative successes of a rolled-back batch into a
    /// zero-success result. Recorded failures are kept.
    pub fn mark_rolled_back(&mut self) {
        self.success_count = 0;
        self.succeeded.clear();
        self.rolled_back = true;
    }
}

/// Remove duplicate ids while preserving first-seen order.
pub fn dedup_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_mixed_outcomes() {
        let mut result = BulkResult::default();
        result.record_success(1);
        result.record_failure(2, "has posts");
        result.record_success(3);

        assert_eq!(result.success_count, 2);
        assert_eq!(result.failure_count, 1);
        assert_eq!(result.succeeded, vec![1, 3]);
        assert_eq!(result.failures[0].id, 2);
        assert!(result.has_failures());
    }

    #[test]
    fn rollback_clears_successes_keeps_failures() {
        let mut result = BulkResult::default();
        result.record_success(1);
        result.record_failure(2, "missing");
        result.mark_rolled_back();

        assert_eq!(result.success_count, 0);
        assert!(result.succeeded.is_empty());
        assert_eq!(result.failure_count, 1);
        assert!(result.rolled_back);
    }

    #[test]
    fn dedup_keeps_order() {
        assert_eq!(dedup_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn mode_deserializes_snake_case() {
        let mode: BulkMode = serde_json::from_str("\"all_or_nothing\"").unwrap();
        assert_eq!(mode, BulkMode::AllOrNothing);
        assert_eq!(BulkMode::default(), BulkMode::PerItem);
    }
}
