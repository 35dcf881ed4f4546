//! Test doubles and builders for exercising the sync engine end to end.
//!
//! The engine talks to the world through two seams - `SheetReader` and
//! `OrderStore` - so the tests substitute a scripted reader and an
//! in-memory store and drive real passes without a network or database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;

use cedar_core::{IntegrationId, ProductId, UserId};
use cedar_sync::db::RepositoryError;
use cedar_sync::models::{ExistingOrder, Integration, NewOrder, Product};
use cedar_sync::sheets::{SheetError, SheetReader, SheetRow};
use cedar_sync::store::OrderStore;

// =============================================================================
// Scripted reader
// =============================================================================

/// Sheet reader that serves canned snapshots keyed by spreadsheet id.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    sheets: HashMap<String, Vec<SheetRow>>,
    denied: HashSet<String>,
}

impl ScriptedReader {
    /// Empty reader; every read fails as unavailable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for the given spreadsheet id.
    #[must_use]
    pub fn with_sheet(mut self, spreadsheet_id: &str, rows: Vec<SheetRow>) -> Self {
        self.sheets.insert(spreadsheet_id.to_owned(), rows);
        self
    }

    /// Answer reads of the given spreadsheet id with an access denial.
    #[must_use]
    pub fn with_denied(mut self, spreadsheet_id: &str) -> Self {
        self.denied.insert(spreadsheet_id.to_owned());
        self
    }
}

impl SheetReader for ScriptedReader {
    async fn read(
        &self,
        spreadsheet_id: &str,
        _sheet_name: &str,
    ) -> Result<Vec<SheetRow>, SheetError> {
        if self.denied.contains(spreadsheet_id) {
            return Err(SheetError::AccessDenied);
        }
        self.sheets.get(spreadsheet_id).cloned().ok_or_else(|| {
            SheetError::SourceUnavailable(format!("no scripted sheet {spreadsheet_id}"))
        })
    }
}

// =============================================================================
// In-memory order store
// =============================================================================

/// One order as the in-memory store persisted it.
#[derive(Debug, Clone)]
pub struct StoredOrder {
    /// The inserted record.
    pub order: NewOrder,
    /// When the store accepted it.
    pub created_at: DateTime<Utc>,
}

/// In-memory [`OrderStore`] with scripted failure modes.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    integrations: Vec<Integration>,
    products: HashMap<(i32, String), Product>,
    seeded_history: HashMap<i32, Vec<ExistingOrder>>,
    reject_order_ids: HashSet<String>,
    orders: Mutex<Vec<StoredOrder>>,
    last_sync: Mutex<HashMap<i32, DateTime<Utc>>>,
}

impl InMemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an integration.
    #[must_use]
    pub fn with_integration(mut self, integration: Integration) -> Self {
        self.integrations.push(integration);
        self
    }

    /// Register a catalog product for a user.
    #[must_use]
    pub fn with_product(mut self, user_id: UserId, product: Product) -> Self {
        self.products
            .insert((user_id.as_i32(), product.sku.clone()), product);
        self
    }

    /// Seed a pre-existing order into a user's history.
    #[must_use]
    pub fn with_history(mut self, user_id: UserId, order: ExistingOrder) -> Self {
        self.seeded_history
            .entry(user_id.as_i32())
            .or_default()
            .push(order);
        self
    }

    /// Make inserts of the given external order id fail, as a store
    /// rejection would.
    #[must_use]
    pub fn rejecting_order_id(mut self, sheet_order_id: &str) -> Self {
        self.reject_order_ids.insert(sheet_order_id.to_owned());
        self
    }

    /// Everything inserted so far, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn inserted(&self) -> Vec<StoredOrder> {
        self.orders.lock().expect("orders lock poisoned").clone()
    }

    /// The recorded last-sync time for an integration, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn last_sync_of(&self, integration_id: IntegrationId) -> Option<DateTime<Utc>> {
        self.last_sync
            .lock()
            .expect("last_sync lock poisoned")
            .get(&integration_id.as_i32())
            .copied()
    }
}

impl OrderStore for InMemoryStore {
    async fn find_product_by_sku(
        &self,
        user_id: UserId,
        sku: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .products
            .get(&(user_id.as_i32(), sku.to_owned()))
            .cloned())
    }

    async fn list_order_history(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ExistingOrder>, RepositoryError> {
        let mut history: Vec<ExistingOrder> = self
            .seeded_history
            .get(&user_id.as_i32())
            .cloned()
            .unwrap_or_default();

        let inserted = self.orders.lock().expect("orders lock poisoned");
        history.extend(
            inserted
                .iter()
                .filter(|stored| stored.order.user_id == user_id)
                .map(|stored| ExistingOrder {
                    phone: stored.order.phone.as_str().to_owned(),
                    product_id: stored.order.product_id,
                    created_at: stored.created_at,
                    sheet_order_id: Some(stored.order.sheet_order_id.clone()),
                }),
        );

        Ok(history)
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<(), RepositoryError> {
        if self.reject_order_ids.contains(&order.sheet_order_id) {
            return Err(RepositoryError::Conflict(format!(
                "order {} rejected by store",
                order.sheet_order_id
            )));
        }

        self.orders
            .lock()
            .expect("orders lock poisoned")
            .push(StoredOrder {
                order: order.clone(),
                created_at: Utc::now(),
            });
        Ok(())
    }

    async fn update_last_sync(
        &self,
        integration_id: IntegrationId,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        if !self.integrations.iter().any(|i| i.id == integration_id) {
            return Err(RepositoryError::NotFound);
        }
        self.last_sync
            .lock()
            .expect("last_sync lock poisoned")
            .insert(integration_id.as_i32(), at);
        Ok(())
    }

    async fn get_integration(
        &self,
        integration_id: IntegrationId,
    ) -> Result<Option<Integration>, RepositoryError> {
        Ok(self
            .integrations
            .iter()
            .find(|i| i.id == integration_id)
            .cloned())
    }

    async fn list_auto_sync_integrations(&self) -> Result<Vec<Integration>, RepositoryError> {
        Ok(self
            .integrations
            .iter()
            .filter(|i| i.auto_sync)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Builders
// =============================================================================

/// An integration bound to the given spreadsheet, auto-sync enabled.
#[must_use]
pub fn integration(id: i32, user_id: i32, spreadsheet_id: &str) -> Integration {
    Integration {
        id: IntegrationId::new(id),
        user_id: UserId::new(user_id),
        spreadsheet_id: spreadsheet_id.to_owned(),
        sheet_name: "Orders".to_owned(),
        auto_sync: true,
        last_sync_at: None,
    }
}

/// A catalog product.
#[must_use]
pub fn product(id: i32, sku: &str, unit_price: Decimal) -> Product {
    Product {
        id: ProductId::new(id),
        sku: sku.to_owned(),
        unit_price,
    }
}

/// A historical order `age_days` in the past.
#[must_use]
pub fn history_order(
    sheet_order_id: Option<&str>,
    phone: &str,
    product_id: i32,
    age_days: i64,
) -> ExistingOrder {
    ExistingOrder {
        phone: phone.to_owned(),
        product_id: ProductId::new(product_id),
        created_at: Utc::now() - TimeDelta::days(age_days),
        sheet_order_id: sheet_order_id.map(str::to_owned),
    }
}

/// A complete raw sheet row.
#[must_use]
pub fn row(index: usize, order_id: &str, phone: &str, sku: &str) -> SheetRow {
    SheetRow {
        index,
        order_id: Some(order_id.to_owned()),
        customer_name: Some("Rana Khoury".to_owned()),
        phone: Some(phone.to_owned()),
        address: Some("Main St".to_owned()),
        city: Some("Beirut".to_owned()),
        product_name: Some("Olive Soap".to_owned()),
        sku: Some(sku.to_owned()),
        quantity: Some("1".to_owned()),
        unit_price: Some("10".to_owned()),
    }
}
