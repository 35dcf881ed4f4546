//! Sync orchestration: one pass per integration, batch runs over many.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::classify::{DuplicateDetector, DuplicatePolicy};
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncErrorKind};
use crate::models::{Integration, NewOrder, Product};
use crate::normalize::normalize;
use crate::sheets::{SheetReader, SheetRow};
use crate::stats::{RowDigest, SyncReport, SyncStats};
use crate::store::OrderStore;

use cedar_core::OrderStatus;

/// Drives sync passes: read → normalize → classify → persist.
///
/// The service is stateless between calls; an external scheduler (cron, the
/// HTTP trigger, the CLI) decides when passes run.
#[derive(Debug, Clone)]
pub struct SyncService<R, S> {
    reader: R,
    store: S,
    detector: DuplicateDetector,
    country_code: String,
}

impl<R, S> SyncService<R, S>
where
    R: SheetReader + Sync,
    S: OrderStore + Sync,
{
    /// Assemble a service from its collaborators and engine configuration.
    #[must_use]
    pub fn new(reader: R, store: S, config: &SyncConfig) -> Self {
        Self {
            reader,
            store,
            detector: DuplicateDetector::new(DuplicatePolicy::with_window_days(
                config.duplicate_window_days,
            )),
            country_code: config.country_code.clone(),
        }
    }

    /// Access the underlying store (for trigger layers that need lookups).
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Run one sync pass for one integration.
    ///
    /// The snapshot read and the history fetch are pass-fatal; everything
    /// after that is per-row. Rows are processed in source order, each
    /// counted exactly once, and the integration's `last_sync_at` is
    /// updated once after the loop.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the snapshot cannot be read, the history
    /// fetch fails, or the final bookkeeping update fails. Rows already
    /// inserted stay committed; the exact-id check makes a retry safe.
    #[instrument(skip(self, integration), fields(integration_id = %integration.id))]
    pub async fn run_sync(&self, integration: &Integration) -> Result<SyncStats, SyncError> {
        let fail = |kind: SyncErrorKind| SyncError::new(integration.id, kind);

        let rows = self
            .reader
            .read(&integration.spreadsheet_id, &integration.sheet_name)
            .await
            .map_err(|e| fail(e.into()))?;

        let mut stats = SyncStats::with_total(rows.len());

        // One snapshot up front; immutable for the whole pass.
        let history = self
            .store
            .list_order_history(integration.user_id)
            .await
            .map_err(|e| fail(e.into()))?;

        // SKU resolutions repeat heavily within one sheet; cache per pass.
        let mut products: HashMap<String, Option<Product>> = HashMap::new();

        for row in &rows {
            let order = match normalize(row, &self.country_code) {
                Ok(order) => order,
                Err(e) => {
                    stats.record_invalid(row.index, e.to_string(), digest(row));
                    continue;
                }
            };

            // Exact re-sync check comes first so already-ingested rows never
            // hit the catalog.
            if self.detector.exact_duplicate(&order, &history) {
                stats.record_existing();
                continue;
            }

            let product = match products.get(&order.sku).cloned() {
                Some(cached) => cached,
                None => {
                    let fetched = match self
                        .store
                        .find_product_by_sku(integration.user_id, &order.sku)
                        .await
                    {
                        Ok(found) => found,
                        Err(e) => {
                            stats.record_invalid(row.index, e.to_string(), digest(row));
                            continue;
                        }
                    };
                    products.insert(order.sku.clone(), fetched.clone());
                    fetched
                }
            };

            let Some(product) = product else {
                stats.record_missing_sku(&order.sku);
                continue;
            };

            let status = if self
                .detector
                .likely_duplicate(&order, product.id, &history, Utc::now())
            {
                OrderStatus::NeedsReview
            } else {
                OrderStatus::New
            };

            let record = NewOrder {
                user_id: integration.user_id,
                customer_name: order.customer_name,
                phone: order.phone,
                shipping_address: order.address,
                city: order.city,
                status,
                product_id: product.id,
                quantity: order.quantity,
                unit_price: order.unit_price,
                total_amount: order.total_amount,
                sheet_order_id: order.external_order_id,
            };

            match self.store.insert_order(&record).await {
                Ok(()) => stats.record_new(),
                Err(e) => stats.record_invalid(row.index, e.to_string(), digest(row)),
            }
        }

        self.store
            .update_last_sync(integration.id, Utc::now())
            .await
            .map_err(|e| fail(e.into()))?;

        info!(
            total = stats.total,
            new = stats.new_count,
            skipped = stats.skipped_count,
            skipped_existing = stats.skipped_existing,
            missing_skus = ?stats.skipped_skus,
            invalid = stats.invalid_rows.len(),
            "Sync pass finished"
        );

        Ok(stats)
    }

    /// Run a pass for every given integration, collecting per-integration
    /// outcomes. One failed pass never stops the others.
    #[instrument(skip_all, fields(integrations = integrations.len()))]
    pub async fn run_all(&self, integrations: &[Integration]) -> SyncReport {
        let mut report = SyncReport::default();

        for integration in integrations {
            match self.run_sync(integration).await {
                Ok(stats) => report.record_success(integration.id, stats),
                Err(e) => {
                    warn!(integration_id = %integration.id, error = %e, "Sync pass failed");
                    report.record_failure(integration.id, &e);
                }
            }
        }

        info!(
            total = report.total_integrations,
            successful = report.successful,
            failed = report.failed,
            "Batch run finished"
        );

        report
    }
}

/// The identity cells of a raw row, kept alongside failure reasons.
fn digest(row: &SheetRow) -> RowDigest {
    RowDigest {
        customer_name: row.customer_name.clone(),
        phone: row.phone.clone(),
        sku: row.sku.clone(),
    }
}
