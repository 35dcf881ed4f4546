//! Product model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cedar_core::ProductId;

/// A catalog product, looked up by SKU during ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Stock-keeping unit; the join key from sheet rows to the catalog.
    pub sku: String,
    /// Current unit price.
    pub unit_price: Decimal,
}
