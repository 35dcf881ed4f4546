//! Spreadsheet ingestion.
//!
//! This module provides:
//! - [`SheetReader`] - the read seam the engine consumes rows through
//! - [`SheetsClient`] - fetches the public tabular export over HTTP
//! - [`SheetRow`] - one raw, untrusted row
//! - Header-synonym mapping for both the CSV and JSON export transports
//!
//! Reading is snapshot-based: every `read` call fetches the source afresh,
//! so a re-invoked pass sees the sheet as it currently is.

mod client;
mod error;
mod parse;

use std::future::Future;

pub use client::SheetsClient;
pub use error::SheetError;

/// One raw data row from the spreadsheet.
///
/// Cells are untyped, untrusted strings straight from the export; blank
/// cells are `None`. Rows never cross the normalizer boundary in this
/// shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based position among the sheet's data rows (header excluded),
    /// matching what a human sees in the source document.
    pub index: usize,
    /// External order identifier cell.
    pub order_id: Option<String>,
    /// Customer name cell.
    pub customer_name: Option<String>,
    /// Phone number cell.
    pub phone: Option<String>,
    /// Shipping address cell.
    pub address: Option<String>,
    /// City cell.
    pub city: Option<String>,
    /// Product name cell.
    pub product_name: Option<String>,
    /// SKU cell.
    pub sku: Option<String>,
    /// Quantity cell.
    pub quantity: Option<String>,
    /// Unit price cell.
    pub unit_price: Option<String>,
}

impl SheetRow {
    /// True when every cell is blank. Such rows are export artifacts
    /// (trailing grid lines) and are discarded before counting.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.order_id.is_none()
            && self.customer_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.product_name.is_none()
            && self.sku.is_none()
            && self.quantity.is_none()
            && self.unit_price.is_none()
    }
}

/// Read access to one spreadsheet source.
///
/// Implementations must return a fresh snapshot on every call; the source
/// is never consumed. Futures are `Send` so passes can run on multi-threaded
/// executors.
pub trait SheetReader {
    /// Fetch all data rows of the named sheet.
    ///
    /// # Errors
    ///
    /// Returns a [`SheetError`] when the source is unreachable, denies
    /// access, is empty, or cannot be parsed as tabular data. All reader
    /// errors abort the sync pass.
    fn read(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> impl Future<Output = Result<Vec<SheetRow>, SheetError>> + Send;
}
