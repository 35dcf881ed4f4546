//! `PostgreSQL` implementation of the order store.
//!
//! Queries use sqlx's runtime API with internal row structs converted into
//! domain models at the boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use cedar_core::{IntegrationId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{ExistingOrder, Integration, NewOrder, Product};
use crate::store::OrderStore;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product lookups.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    sku: String,
    unit_price: Decimal,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            sku: row.sku,
            unit_price: row.unit_price,
        }
    }
}

/// Internal row type for the order-history snapshot.
#[derive(Debug, sqlx::FromRow)]
struct ExistingOrderRow {
    phone: String,
    product_id: i32,
    created_at: DateTime<Utc>,
    sheet_order_id: Option<String>,
}

impl From<ExistingOrderRow> for ExistingOrder {
    fn from(row: ExistingOrderRow) -> Self {
        Self {
            phone: row.phone,
            product_id: ProductId::new(row.product_id),
            created_at: row.created_at,
            sheet_order_id: row.sheet_order_id,
        }
    }
}

/// Internal row type for integrations.
#[derive(Debug, sqlx::FromRow)]
struct IntegrationRow {
    id: i32,
    user_id: i32,
    spreadsheet_id: String,
    sheet_name: String,
    auto_sync: bool,
    last_sync_at: Option<DateTime<Utc>>,
}

impl From<IntegrationRow> for Integration {
    fn from(row: IntegrationRow) -> Self {
        Self {
            id: IntegrationId::new(row.id),
            user_id: UserId::new(row.user_id),
            spreadsheet_id: row.spreadsheet_id,
            sheet_name: row.sheet_name,
            auto_sync: row.auto_sync,
            last_sync_at: row.last_sync_at,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Order store backed by the shared `PostgreSQL` database.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool (for health checks).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl OrderStore for PgOrderStore {
    async fn find_product_by_sku(
        &self,
        user_id: UserId,
        sku: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, sku, unit_price
            FROM products
            WHERE user_id = $1 AND sku = $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn list_order_history(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ExistingOrder>, RepositoryError> {
        let rows = sqlx::query_as::<_, ExistingOrderRow>(
            r"
            SELECT phone, product_id, created_at, sheet_order_id
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ExistingOrder::from).collect())
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO orders (
                user_id, customer_name, phone, shipping_address, city,
                status, product_id, quantity, unit_price, total_amount,
                sheet_order_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(order.user_id.as_i32())
        .bind(&order.customer_name)
        .bind(order.phone.as_str())
        .bind(&order.shipping_address)
        .bind(&order.city)
        .bind(order.status.as_i16())
        .bind(order.product_id.as_i32())
        .bind(order.quantity)
        .bind(order.unit_price)
        .bind(order.total_amount)
        .bind(&order.sheet_order_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                RepositoryError::Conflict(format!(
                    "order {} already exists",
                    order.sheet_order_id
                ))
            } else {
                RepositoryError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn update_last_sync(
        &self,
        integration_id: IntegrationId,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE integrations
            SET last_sync_at = $1
            WHERE id = $2
            ",
        )
        .bind(at)
        .bind(integration_id.as_i32())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn get_integration(
        &self,
        integration_id: IntegrationId,
    ) -> Result<Option<Integration>, RepositoryError> {
        let row = sqlx::query_as::<_, IntegrationRow>(
            r"
            SELECT id, user_id, spreadsheet_id, sheet_name, auto_sync, last_sync_at
            FROM integrations
            WHERE id = $1
            ",
        )
        .bind(integration_id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Integration::from))
    }

    async fn list_auto_sync_integrations(&self) -> Result<Vec<Integration>, RepositoryError> {
        let rows = sqlx::query_as::<_, IntegrationRow>(
            r"
            SELECT id, user_id, spreadsheet_id, sheet_name, auto_sync, last_sync_at
            FROM integrations
            WHERE auto_sync = TRUE
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Integration::from).collect())
    }
}
