//! Per-pass statistics and batch reports.

use serde::{Deserialize, Serialize};

use cedar_core::IntegrationId;

use crate::error::SyncError;

/// Outcome of one sync pass over one integration.
///
/// Every row of the snapshot is counted exactly once, so
/// `total == new_count + skipped_count` holds for every pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    /// Number of data rows in the snapshot.
    pub total: usize,
    /// Rows inserted (standard or flagged-for-review status).
    pub new_count: usize,
    /// Rows not inserted, for any reason.
    pub skipped_count: usize,
    /// Unique SKUs that had no catalog match, in first-seen order.
    pub skipped_skus: Vec<String>,
    /// Rows skipped because their external order id was already ingested.
    pub skipped_existing: usize,
    /// Rows that failed normalization or were rejected by the store.
    pub invalid_rows: Vec<InvalidRow>,
}

/// One row that could not be ingested, kept for triage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidRow {
    /// 1-based row position in the source sheet's data rows.
    pub row: usize,
    /// Why the row was rejected.
    pub reason: String,
    /// The identifying cells as they appeared in the sheet.
    pub data: RowDigest,
}

/// The identity cells of a rejected row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDigest {
    /// Customer name cell, if present.
    pub customer_name: Option<String>,
    /// Phone cell, if present.
    pub phone: Option<String>,
    /// SKU cell, if present.
    pub sku: Option<String>,
}

impl SyncStats {
    /// Stats for a snapshot of `total` rows, before any processing.
    #[must_use]
    pub fn with_total(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Record a successful insert (new or flagged for review).
    pub(crate) const fn record_new(&mut self) {
        self.new_count += 1;
    }

    /// Record a skip because the external order id already exists.
    pub(crate) const fn record_existing(&mut self) {
        self.skipped_count += 1;
        self.skipped_existing += 1;
    }

    /// Record a skip because the SKU has no catalog match.
    pub(crate) fn record_missing_sku(&mut self, sku: &str) {
        self.skipped_count += 1;
        if !self.skipped_skus.iter().any(|s| s == sku) {
            self.skipped_skus.push(sku.to_owned());
        }
    }

    /// Record an invalid row (normalization failure or store rejection).
    pub(crate) fn record_invalid(&mut self, row: usize, reason: String, data: RowDigest) {
        self.skipped_count += 1;
        self.invalid_rows.push(InvalidRow { row, reason, data });
    }

    /// Whether the counters add up; always true for engine-produced stats.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.total == self.new_count + self.skipped_count
    }
}

/// Aggregate result of a batch run over several integrations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Integrations attempted.
    pub total_integrations: usize,
    /// Passes that completed (possibly with skipped rows).
    pub successful: usize,
    /// Passes that aborted with a pass-fatal error.
    pub failed: usize,
    /// Per-integration outcomes, in run order.
    pub details: Vec<IntegrationOutcome>,
}

impl SyncReport {
    pub(crate) fn record_success(&mut self, integration_id: IntegrationId, stats: SyncStats) {
        self.total_integrations += 1;
        self.successful += 1;
        self.details.push(IntegrationOutcome {
            integration_id,
            result: PassResult::Completed { stats },
        });
    }

    pub(crate) fn record_failure(&mut self, integration_id: IntegrationId, error: &SyncError) {
        self.total_integrations += 1;
        self.failed += 1;
        self.details.push(IntegrationOutcome {
            integration_id,
            result: PassResult::Failed {
                error: error.to_string(),
            },
        });
    }
}

/// One integration's slot in a batch report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationOutcome {
    /// Which integration this outcome belongs to.
    pub integration_id: IntegrationId,
    /// Stats on success, error text on failure.
    #[serde(flatten)]
    pub result: PassResult,
}

/// Success-or-failure payload of one batch slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassResult {
    /// The pass ran to completion.
    Completed {
        /// The pass statistics.
        stats: SyncStats,
    },
    /// The pass aborted before completion.
    Failed {
        /// Rendered pass-fatal error.
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_stay_consistent() {
        let mut stats = SyncStats::with_total(4);
        stats.record_new();
        stats.record_existing();
        stats.record_missing_sku("ZZZ");
        stats.record_invalid(4, "missing required field `phone`".to_owned(), RowDigest::default());

        assert!(stats.is_consistent());
        assert_eq!(stats.new_count, 1);
        assert_eq!(stats.skipped_count, 3);
        assert_eq!(stats.skipped_existing, 1);
        assert_eq!(stats.skipped_skus, vec!["ZZZ".to_owned()]);
        assert_eq!(stats.invalid_rows.len(), 1);
    }

    #[test]
    fn test_zero_row_stats_consistent() {
        assert!(SyncStats::with_total(0).is_consistent());
    }

    #[test]
    fn test_skipped_skus_deduplicated() {
        let mut stats = SyncStats::with_total(3);
        stats.record_missing_sku("ZZZ");
        stats.record_missing_sku("ZZZ");
        stats.record_missing_sku("YYY");

        assert_eq!(stats.skipped_skus, vec!["ZZZ".to_owned(), "YYY".to_owned()]);
        assert_eq!(stats.skipped_count, 3);
    }
}
