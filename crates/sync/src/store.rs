//! The order-store seam.
//!
//! The engine treats the relational store as a narrow record interface; the
//! production implementation is [`crate::db::PgOrderStore`], and tests
//! substitute an in-memory double. Methods return `Send` futures so the
//! engine can be driven from multi-threaded executors and web handlers.

use std::future::Future;

use chrono::{DateTime, Utc};

use cedar_core::{IntegrationId, UserId};

use crate::db::RepositoryError;
use crate::models::{ExistingOrder, Integration, NewOrder, Product};

/// Record operations the sync engine needs from the order store.
pub trait OrderStore {
    /// Resolve a SKU to a catalog product within a user's catalog.
    fn find_product_by_sku(
        &self,
        user_id: UserId,
        sku: &str,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;

    /// Snapshot of a user's order history for duplicate comparison.
    ///
    /// Fetched once per pass, before any insert decision.
    fn list_order_history(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<ExistingOrder>, RepositoryError>> + Send;

    /// Insert one normalized order.
    fn insert_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Record when an integration's last sync pass completed.
    fn update_last_sync(
        &self,
        integration_id: IntegrationId,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Look up one integration.
    fn get_integration(
        &self,
        integration_id: IntegrationId,
    ) -> impl Future<Output = Result<Option<Integration>, RepositoryError>> + Send;

    /// All integrations flagged for automatic sync.
    fn list_auto_sync_integrations(
        &self,
    ) -> impl Future<Output = Result<Vec<Integration>, RepositoryError>> + Send;
}
