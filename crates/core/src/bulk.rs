//! Outcome types for bulk administrative mutations.
//!
//! Bulk create/update calls process each item independently: a failure on one
//! item is recorded against its input index and does not abort the rest. The
//! successful subset commits; only an all-items-failed batch is reported as an
//! overall failure by the HTTP layer. Deleting ids that partially exist is not
//! an error either -- the outcome reports what was deleted and what was
//! missing.

use serde::Serialize;

use crate::types::DbId;

/// A single failed item in a bulk operation, keyed by its input index.
#[derive(Debug, Clone, Serialize)]
pub struct BulkError {
    pub index: usize,
    pub message: String,
}

impl BulkError {
    pub fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }
}

/// Result of a bulk create/update: the items that succeeded plus the
/// per-index errors for those that did not.
#[derive(Debug, Serialize)]
pub struct BulkOutcome<T> {
    pub items: Vec<T>,
    pub errors: Vec<BulkError>,
}

impl<T> Default for BulkOutcome<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> BulkOutcome<T> {
    pub fn new(items: Vec<T>, errors: Vec<BulkError>) -> Self {
        Self { items, errors }
    }

    /// True when at least one item failed but at least one succeeded.
    pub fn is_partial(&self) -> bool {
        !self.items.is_empty() && !self.errors.is_empty()
    }

    /// True when every attempted item failed. An empty batch is not a failure.
    pub fn all_failed(&self) -> bool {
        self.items.is_empty() && !self.errors.is_empty()
    }
}

/// Result of a bulk delete over a possibly partially-existing id set.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
    pub missing_ids: Vec<DbId>,
}

impl DeleteOutcome {
    /// Compute the outcome from the requested ids and the ids actually found.
    /// Preserves the request order of missing ids.
    pub fn from_requested(requested: &[DbId], found: &[DbId], deleted_count: u64) -> Self {
        let missing_ids = requested
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect();
        Self {
            deleted_count,
            missing_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_outcome_is_neither_success_nor_failure() {
        let outcome = BulkOutcome::new(vec![1, 2], vec![BulkError::new(1, "duplicate slug")]);
        assert!(outcome.is_partial());
        assert!(!outcome.all_failed());
    }

    #[test]
    fn all_failed_requires_errors() {
        let empty: BulkOutcome<i32> = BulkOutcome::new(vec![], vec![]);
        assert!(!empty.all_failed(), "empty batch is not a failure");

        let failed: BulkOutcome<i32> =
            BulkOutcome::new(vec![], vec![BulkError::new(0, "not found")]);
        assert!(failed.all_failed());
        assert!(!failed.is_partial());
    }

    #[test]
    fn delete_outcome_reports_missing_ids_in_request_order() {
        let outcome = DeleteOutcome::from_requested(&[10, 999, 11, 998], &[10, 11], 2);
        assert_eq!(outcome.deleted_count, 2);
        assert_eq!(outcome.missing_ids, vec![999, 998]);
    }

    #[test]
    fn delete_outcome_with_nothing_missing() {
        let outcome = DeleteOutcome::from_requested(&[1, 2], &[1, 2], 2);
        assert_eq!(outcome.deleted_count, 2);
        assert!(outcome.missing_ids.is_empty());
    }
}
