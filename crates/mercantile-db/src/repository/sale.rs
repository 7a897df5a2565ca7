//! # Sale Repository
//!
//! Read access to sale documents (header + lines).
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (engine, one atomic unit)                                   │
//! │     └── engine.create_sale() → header + lines + stock decrements       │
//! │                                                                         │
//! │  2. (OPTIONAL) CANCEL (engine, one atomic unit)                        │
//! │     └── engine.cancel_sale() → status=cancelled + stock restored       │
//! │                                                                         │
//! │  Reads in between go through this repository.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;

use crate::error::DbResult;
use mercantile_core::{Sale, SaleDocument, SaleLine};

pub(crate) const SALE_COLUMNS: &str = "id, tenant_id, number, client_id, direct_client_name, \
     direct_client_email, direct_client_phone, status, subtotal_cents, discount_cents, \
     tax_cents, total_cents, payment_method, notes, created_at, updated_at, cancelled_at";

pub(crate) const SALE_LINE_COLUMNS: &str = "id, sale_id, product_id, quantity, \
     unit_price_cents, subtotal_cents, discount_cents, created_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale header by ID, scoped to the tenant.
    pub async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ? AND tenant_id = ?"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all lines of a sale, in insertion order.
    pub async fn get_lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        // rowid preserves insertion order within a document
        let lines = sqlx::query_as::<_, SaleLine>(&format!(
            "SELECT {SALE_LINE_COLUMNS} FROM sale_lines WHERE sale_id = ? ORDER BY rowid"
        ))
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Gets a fully materialized sale (header + lines), scoped to the tenant.
    pub async fn get_document(&self, tenant_id: &str, id: &str) -> DbResult<Option<SaleDocument>> {
        let Some(header) = self.get_by_id(tenant_id, id).await? else {
            return Ok(None);
        };
        let lines = self.get_lines(id).await?;
        Ok(Some(SaleDocument { header, lines }))
    }

    /// Lists a tenant's sales, most recent first.
    pub async fn list_for_tenant(&self, tenant_id: &str, limit: u32) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE tenant_id = ? ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}
