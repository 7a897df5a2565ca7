//! # Quote Repository
//!
//! Read access to quote documents (header + lines). A quote becomes terminal
//! once the engine converts it to an order; the `converted` flag never goes
//! back to false.

use sqlx::SqlitePool;

use crate::error::DbResult;
use mercantile_core::{Quote, QuoteDocument, QuoteLine};

pub(crate) const QUOTE_COLUMNS: &str = "id, tenant_id, number, client_id, direct_client_name, \
     direct_client_email, direct_client_phone, validity_date, status, converted, \
     subtotal_cents, discount_cents, tax_cents, total_cents, notes, created_at, updated_at";

pub(crate) const QUOTE_LINE_COLUMNS: &str = "id, quote_id, product_id, quantity, \
     unit_price_cents, subtotal_cents, discount_cents, created_at";

/// Repository for quote database operations.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: SqlitePool,
}

impl QuoteRepository {
    /// Creates a new QuoteRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuoteRepository { pool }
    }

    /// Gets a quote header by ID, scoped to the tenant.
    pub async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Quote>> {
        let quote = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ? AND tenant_id = ?"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quote)
    }

    /// Gets all lines of a quote, in insertion order.
    pub async fn get_lines(&self, quote_id: &str) -> DbResult<Vec<QuoteLine>> {
        let lines = sqlx::query_as::<_, QuoteLine>(&format!(
            "SELECT {QUOTE_LINE_COLUMNS} FROM quote_lines WHERE quote_id = ? ORDER BY rowid"
        ))
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Gets a fully materialized quote (header + lines), scoped to the tenant.
    pub async fn get_document(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> DbResult<Option<QuoteDocument>> {
        let Some(header) = self.get_by_id(tenant_id, id).await? else {
            return Ok(None);
        };
        let lines = self.get_lines(id).await?;
        Ok(Some(QuoteDocument { header, lines }))
    }

    /// Lists a tenant's quotes, most recent first.
    pub async fn list_for_tenant(&self, tenant_id: &str, limit: u32) -> DbResult<Vec<Quote>> {
        let quotes = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes \
             WHERE tenant_id = ? ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }
}
