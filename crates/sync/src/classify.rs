//! Two-tier duplicate detection.
//!
//! Tier one: an exact match on the spreadsheet's own order id — the row has
//! already been ingested, so a re-sync must skip it (this is what makes
//! passes idempotent). Checked before any catalog lookup.
//!
//! Tier two: no id match, but the same customer phone ordered the same
//! product within a recent window. That usually means the sheet carries the
//! order twice under different ids, but it can also be a genuine repeat
//! customer — so the row is inserted flagged for review, never dropped.

use chrono::{DateTime, TimeDelta, Utc};

use cedar_core::ProductId;

use crate::models::ExistingOrder;
use crate::normalize::NormalizedOrder;

/// Default width of the fuzzy duplicate window, in days.
pub const DEFAULT_DUPLICATE_WINDOW_DAYS: i64 = 7;

/// How a normalized row relates to the existing order history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No resemblance to any existing order; insert with the standard
    /// status.
    New,
    /// The external order id is already in the store; skip entirely.
    ExactDuplicate,
    /// Same phone and product as a recent order; insert flagged for review.
    LikelyDuplicate,
}

/// Configuration for the fuzzy duplicate tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicatePolicy {
    window: TimeDelta,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        Self::with_window_days(DEFAULT_DUPLICATE_WINDOW_DAYS)
    }
}

impl DuplicatePolicy {
    /// Policy with a window of the given number of days.
    #[must_use]
    pub fn with_window_days(days: i64) -> Self {
        Self {
            window: TimeDelta::days(days),
        }
    }

    /// The configured window.
    #[must_use]
    pub const fn window(&self) -> TimeDelta {
        self.window
    }
}

/// Stateless detector applying the two-tier policy to a history snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateDetector {
    policy: DuplicatePolicy,
}

impl DuplicateDetector {
    /// Detector with the given policy.
    #[must_use]
    pub const fn new(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    /// Tier one: does any history record carry this external order id?
    #[must_use]
    pub fn exact_duplicate(&self, order: &NormalizedOrder, history: &[ExistingOrder]) -> bool {
        history
            .iter()
            .any(|o| o.sheet_order_id.as_deref() == Some(order.external_order_id.as_str()))
    }

    /// Tier two: same phone, same product, within the window of `now`.
    #[must_use]
    pub fn likely_duplicate(
        &self,
        order: &NormalizedOrder,
        product_id: ProductId,
        history: &[ExistingOrder],
        now: DateTime<Utc>,
    ) -> bool {
        history.iter().any(|o| {
            o.phone == order.phone.as_str()
                && o.product_id == product_id
                && (now - o.created_at).abs() <= self.policy.window
        })
    }

    /// Full classification of a row whose SKU has already resolved to a
    /// product.
    #[must_use]
    pub fn classify(
        &self,
        order: &NormalizedOrder,
        product_id: ProductId,
        history: &[ExistingOrder],
        now: DateTime<Utc>,
    ) -> Classification {
        if self.exact_duplicate(order, history) {
            Classification::ExactDuplicate
        } else if self.likely_duplicate(order, product_id, history, now) {
            Classification::LikelyDuplicate
        } else {
            Classification::New
        }
    }
}
