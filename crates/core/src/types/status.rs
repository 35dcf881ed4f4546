//! Order status markers.

use serde::{Deserialize, Serialize};

/// Status assigned to an order at insertion time.
///
/// The order store keeps statuses as small integers shared with the
/// dashboard's full status workflow; the intake pipeline only ever writes
/// these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// A freshly ingested order.
    #[default]
    New,
    /// Inserted, but flagged for human review as a probable duplicate of a
    /// recent order by the same customer for the same product.
    NeedsReview,
}

impl OrderStatus {
    /// Numeric code persisted in the order store's status column.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::New => 1,
            Self::NeedsReview => 15,
        }
    }

    /// Map a stored status code back to a pipeline status, if it is one of
    /// the codes the pipeline writes.
    #[must_use]
    pub const fn from_i16(code: i16) -> Option<Self> {
        match code {
            1 => Some(Self::New),
            15 => Some(Self::NeedsReview),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::NeedsReview => write!(f, "needs_review"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(OrderStatus::New.as_i16(), 1);
        assert_eq!(OrderStatus::NeedsReview.as_i16(), 15);
    }

    #[test]
    fn test_status_code_roundtrip() {
        assert_eq!(OrderStatus::from_i16(1), Some(OrderStatus::New));
        assert_eq!(OrderStatus::from_i16(15), Some(OrderStatus::NeedsReview));
        assert_eq!(OrderStatus::from_i16(3), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderStatus::New.to_string(), "new");
        assert_eq!(OrderStatus::NeedsReview.to_string(), "needs_review");
    }
}
