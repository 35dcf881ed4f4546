//! Spreadsheet reader errors.

use thiserror::Error;

/// Errors that can occur while reading a spreadsheet export.
///
/// Every variant is pass-fatal: the orchestrator aborts the whole pass and
/// surfaces the error, leaving bookkeeping untouched.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The export endpoint could not be reached or answered with a
    /// non-permission failure status.
    #[error("spreadsheet source unavailable: {0}")]
    SourceUnavailable(String),

    /// The export answered with a permission-style status. The sheet is
    /// probably not shared as "anyone with the link can view".
    #[error("access to spreadsheet denied; check that it is shared publicly")]
    AccessDenied,

    /// The sheet parsed fine but contains no data rows after the header.
    #[error("sheet contains no data rows")]
    EmptySource,

    /// The response body could not be parsed as tabular data.
    #[error("could not parse sheet export: {0}")]
    Format(String),
}
