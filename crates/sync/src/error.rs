//! Pass-fatal sync errors.

use thiserror::Error;

use cedar_core::IntegrationId;

use crate::db::RepositoryError;
use crate::sheets::SheetError;

/// Underlying cause of an aborted sync pass.
#[derive(Debug, Error)]
pub enum SyncErrorKind {
    /// Reading the spreadsheet snapshot failed.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// A pass-level store operation failed (history fetch, bookkeeping).
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// A sync pass aborted before completion.
///
/// Only whole-pass failures surface this way; row-level defects are
/// recorded in the pass statistics instead.
#[derive(Debug, Error)]
#[error("sync failed for integration {integration_id}: {kind}")]
pub struct SyncError {
    /// The integration whose pass aborted.
    pub integration_id: IntegrationId,
    /// What went wrong.
    #[source]
    pub kind: SyncErrorKind,
}

impl SyncError {
    /// Attach an integration id to an underlying cause.
    pub fn new(integration_id: IntegrationId, kind: impl Into<SyncErrorKind>) -> Self {
        Self {
            integration_id,
            kind: kind.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_integration() {
        let err = SyncError::new(IntegrationId::new(7), SheetError::AccessDenied);
        let rendered = err.to_string();
        assert!(rendered.contains("integration 7"));
        assert!(rendered.contains("access to spreadsheet denied"));
    }
}
