//! Order models: the read-only history snapshot and the insert record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cedar_core::{OrderStatus, Phone, ProductId, UserId};

/// Read-only view of an already-persisted order, used for duplicate
/// detection. Scoped to one user; never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingOrder {
    /// Canonical phone the order was placed with.
    pub phone: String,
    /// Product that was ordered.
    pub product_id: ProductId,
    /// When the order entered the store.
    pub created_at: DateTime<Utc>,
    /// The spreadsheet's own order identifier. Manually created orders
    /// predate the pipeline and carry none.
    pub sheet_order_id: Option<String>,
}

/// A fully normalized order ready for insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    /// Owning user.
    pub user_id: UserId,
    /// Customer display name.
    pub customer_name: String,
    /// Canonical phone number.
    pub phone: Phone,
    /// Shipping address.
    pub shipping_address: String,
    /// City.
    pub city: String,
    /// Status marker assigned by the duplicate detector.
    pub status: OrderStatus,
    /// Resolved catalog product.
    pub product_id: ProductId,
    /// Ordered quantity (>= 1).
    pub quantity: i32,
    /// Unit price at ingestion time.
    pub unit_price: Decimal,
    /// Recomputed `unit_price * quantity`.
    pub total_amount: Decimal,
    /// The spreadsheet's own order identifier; the idempotency key for
    /// re-syncs.
    pub sheet_order_id: String,
}
