//! # Order Repository
//!
//! Read access to order documents (header + lines). Orders are created by the
//! engine, either from direct entry or from quote conversion; they never
//! touch stock.

use sqlx::SqlitePool;

use crate::error::DbResult;
use mercantile_core::{Order, OrderDocument, OrderLine};

pub(crate) const ORDER_COLUMNS: &str = "id, tenant_id, number, client_id, direct_client_name, \
     direct_client_email, direct_client_phone, origin_quote_id, status, completed, \
     subtotal_cents, discount_cents, tax_cents, total_cents, notes, created_at, updated_at";

pub(crate) const ORDER_LINE_COLUMNS: &str = "id, order_id, product_id, quantity, \
     unit_price_cents, subtotal_cents, discount_cents, created_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order header by ID, scoped to the tenant.
    pub async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ? AND tenant_id = ?"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all lines of an order, in insertion order.
    pub async fn get_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(&format!(
            "SELECT {ORDER_LINE_COLUMNS} FROM order_lines WHERE order_id = ? ORDER BY rowid"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Gets a fully materialized order (header + lines), scoped to the tenant.
    pub async fn get_document(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> DbResult<Option<OrderDocument>> {
        let Some(header) = self.get_by_id(tenant_id, id).await? else {
            return Ok(None);
        };
        let lines = self.get_lines(id).await?;
        Ok(Some(OrderDocument { header, lines }))
    }

    /// Lists a tenant's orders, most recent first.
    pub async fn list_for_tenant(&self, tenant_id: &str, limit: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE tenant_id = ? ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}
