//! # Quote Workflows
//!
//! Creation, mutation and one-shot conversion of quotes.
//!
//! ## Conversion
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  convert_quote_to_order                                 │
//! │                                                                         │
//! │  fetch quote (tenant-scoped)                                            │
//! │       │                                                                 │
//! │       ├── converted flag set        → AlreadyConverted                 │
//! │       ├── status forbids converted  → InvalidStatusTransition          │
//! │       ▼                                                                 │
//! │  copy lines (line discounts reset to 0 on the order copy)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write_order(origin_quote_id = quote.id)   fresh ORD number            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE quotes SET converted = 1 .. WHERE converted = 0                │
//! │       │          rows_affected = 0 → AlreadyConverted (lost the race)  │
//! │       ▼                                                                 │
//! │  commit                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The flag flips false→true exactly once; conversion never touches stock
//! and leaves the quote's own rows otherwise untouched for audit.

use chrono::Utc;
use tracing::{debug, info};

use crate::engine::{
    generate_id, lookup, map_number_collision, numbering, order::write_order, ClientColumns,
    CommerceEngine,
};
use crate::error::EngineResult;
use mercantile_core::validation;
use mercantile_core::{
    CoreError, CreateQuoteInput, DocumentKind, DocumentTotals, LineInput, OrderDocument, Quote,
    QuoteDocument, QuoteLine, QuoteStatus, UpdateQuoteInput, ValidationError,
};

impl CommerceEngine {
    /// Creates a quote: header and lines in one atomic unit. No stock moves.
    pub async fn create_quote(
        &self,
        tenant_id: &str,
        input: CreateQuoteInput,
    ) -> EngineResult<QuoteDocument> {
        validation::validate_create_quote(&input)?;
        debug!(tenant_id, lines = input.lines.len(), "Creating quote");

        let mut tx = self.pool().begin().await?;

        let client = lookup::resolve_client(&mut tx, tenant_id, input.client.as_ref()).await?;

        let now = Utc::now();
        let quote_id = generate_id();
        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let product = lookup::product_for_tenant(&mut tx, tenant_id, &line.product_id).await?;
            lines.push(QuoteLine {
                id: generate_id(),
                quote_id: quote_id.clone(),
                product_id: product.id,
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                subtotal_cents: line.subtotal_cents,
                discount_cents: line.discount_cents,
                created_at: now,
            });
        }

        let number =
            numbering::next_document_number(&mut tx, tenant_id, DocumentKind::Quote).await?;

        let header = Quote {
            id: quote_id,
            tenant_id: tenant_id.to_string(),
            number,
            client_id: client.client_id,
            direct_client_name: client.direct_name,
            direct_client_email: client.direct_email,
            direct_client_phone: client.direct_phone,
            validity_date: input.validity_date,
            status: QuoteStatus::Pending,
            converted: false,
            subtotal_cents: input.totals.subtotal_cents,
            discount_cents: input.totals.discount_cents,
            tax_cents: input.totals.tax_cents,
            total_cents: input.totals.total_cents,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO quotes (
                id, tenant_id, number, client_id, direct_client_name, direct_client_email,
                direct_client_phone, validity_date, status, converted, subtotal_cents,
                discount_cents, tax_cents, total_cents, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&header.id)
        .bind(&header.tenant_id)
        .bind(&header.number)
        .bind(&header.client_id)
        .bind(&header.direct_client_name)
        .bind(&header.direct_client_email)
        .bind(&header.direct_client_phone)
        .bind(header.validity_date)
        .bind(header.status)
        .bind(header.converted)
        .bind(header.subtotal_cents)
        .bind(header.discount_cents)
        .bind(header.tax_cents)
        .bind(header.total_cents)
        .bind(&header.notes)
        .bind(header.created_at)
        .bind(header.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_number_collision(e.into(), "Quote", &header.number))?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO quote_lines (
                    id, quote_id, product_id, quantity, unit_price_cents,
                    subtotal_cents, discount_cents, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&line.id)
            .bind(&line.quote_id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.subtotal_cents)
            .bind(line.discount_cents)
            .bind(line.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            tenant_id,
            quote_id = %header.id,
            number = %header.number,
            "Quote created"
        );

        Ok(QuoteDocument { header, lines })
    }

    /// Applies a closed patch to a quote's mutable header fields.
    ///
    /// Converted quotes refuse any mutation. An empty patch is a no-op and
    /// does not bump `updated_at`.
    pub async fn update_quote(
        &self,
        tenant_id: &str,
        quote_id: &str,
        patch: UpdateQuoteInput,
    ) -> EngineResult<Quote> {
        debug!(tenant_id, quote_id, "Updating quote");

        let mut tx = self.pool().begin().await?;

        let mut quote = fetch_quote(&mut tx, tenant_id, quote_id).await?;

        if quote.converted || quote.status.is_terminal() {
            return Err(CoreError::AlreadyConverted {
                quote_id: quote.id,
            }
            .into());
        }

        if patch.is_empty() {
            return Ok(quote);
        }

        if let Some(client_ref) = patch.client.as_ref() {
            validation::validate_client_ref(Some(client_ref))?;
            let client = lookup::resolve_client(&mut tx, tenant_id, Some(client_ref)).await?;
            quote.client_id = client.client_id;
            quote.direct_client_name = client.direct_name;
            quote.direct_client_email = client.direct_email;
            quote.direct_client_phone = client.direct_phone;
        }
        if let Some(validity_date) = patch.validity_date {
            quote.validity_date = validity_date;
        }
        if let Some(notes) = patch.notes {
            quote.notes = Some(notes);
        }
        quote.updated_at = Utc::now();

        sqlx::query(
            "UPDATE quotes SET client_id = ?, direct_client_name = ?, \
             direct_client_email = ?, direct_client_phone = ?, validity_date = ?, \
             notes = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&quote.client_id)
        .bind(&quote.direct_client_name)
        .bind(&quote.direct_client_email)
        .bind(&quote.direct_client_phone)
        .bind(quote.validity_date)
        .bind(&quote.notes)
        .bind(quote.updated_at)
        .bind(&quote.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(tenant_id, quote_id = %quote.id, "Quote updated");
        Ok(quote)
    }

    /// Moves a quote between informational statuses (accepted/rejected).
    ///
    /// `converted` is not a valid target here; only
    /// [`convert_quote_to_order`](Self::convert_quote_to_order) may set it.
    pub async fn update_quote_status(
        &self,
        tenant_id: &str,
        quote_id: &str,
        status: QuoteStatus,
    ) -> EngineResult<Quote> {
        if status == QuoteStatus::Converted {
            return Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec!["accepted".to_string(), "rejected".to_string()],
            }
            .into());
        }

        debug!(tenant_id, quote_id, status = status.as_str(), "Updating quote status");

        let mut tx = self.pool().begin().await?;

        let mut quote = fetch_quote(&mut tx, tenant_id, quote_id).await?;

        if quote.converted {
            return Err(CoreError::AlreadyConverted {
                quote_id: quote.id,
            }
            .into());
        }

        if !quote.status.can_transition_to(status) {
            return Err(CoreError::InvalidStatusTransition {
                document: "Quote",
                id: quote.id,
                from: quote.status.as_str().to_string(),
                to: status.as_str().to_string(),
            }
            .into());
        }

        let now = Utc::now();
        sqlx::query("UPDATE quotes SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now)
            .bind(&quote.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        quote.status = status;
        quote.updated_at = now;

        info!(
            tenant_id,
            quote_id = %quote.id,
            status = quote.status.as_str(),
            "Quote status updated"
        );

        Ok(quote)
    }

    /// Converts a quote into a new pending order, at most once.
    ///
    /// The order receives a fresh year-scoped ORD number, copies of the
    /// quote's lines and totals, and a back-reference via `origin_quote_id`.
    /// Line discounts are reset to zero on the order copy; the header
    /// discount carries over. An expired validity date does not block
    /// conversion.
    pub async fn convert_quote_to_order(
        &self,
        tenant_id: &str,
        quote_id: &str,
    ) -> EngineResult<OrderDocument> {
        debug!(tenant_id, quote_id, "Converting quote to order");

        let mut tx = self.pool().begin().await?;

        let quote = fetch_quote(&mut tx, tenant_id, quote_id).await?;

        if quote.converted {
            return Err(CoreError::AlreadyConverted {
                quote_id: quote.id,
            }
            .into());
        }

        // Covers rejected quotes: their state machine has no path to
        // converted.
        if !quote.status.can_transition_to(QuoteStatus::Converted) {
            return Err(CoreError::InvalidStatusTransition {
                document: "Quote",
                id: quote.id,
                from: quote.status.as_str().to_string(),
                to: QuoteStatus::Converted.as_str().to_string(),
            }
            .into());
        }

        let quote_lines = sqlx::query_as::<_, QuoteLine>(&format!(
            "SELECT {} FROM quote_lines WHERE quote_id = ? ORDER BY rowid",
            crate::repository::quote::QUOTE_LINE_COLUMNS
        ))
        .bind(&quote.id)
        .fetch_all(&mut *tx)
        .await?;

        let lines: Vec<LineInput> = quote_lines
            .iter()
            .map(|line| LineInput {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                subtotal_cents: line.subtotal_cents,
                discount_cents: 0,
            })
            .collect();

        let client = ClientColumns {
            client_id: quote.client_id.clone(),
            direct_name: quote.direct_client_name.clone(),
            direct_email: quote.direct_client_email.clone(),
            direct_phone: quote.direct_client_phone.clone(),
        };
        let totals = DocumentTotals {
            subtotal_cents: quote.subtotal_cents,
            discount_cents: quote.discount_cents,
            tax_cents: quote.tax_cents,
            total_cents: quote.total_cents,
        };

        let order = write_order(
            &mut tx,
            tenant_id,
            client,
            totals,
            quote.notes.clone(),
            Some(quote.id.clone()),
            &lines,
        )
        .await?;

        // The flag guard closes the race window between our read above and
        // this write: whoever flips it first wins, the loser rolls back.
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE quotes SET converted = 1, status = ?, updated_at = ? \
             WHERE id = ? AND converted = 0",
        )
        .bind(QuoteStatus::Converted)
        .bind(now)
        .bind(&quote.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::AlreadyConverted {
                quote_id: quote.id,
            }
            .into());
        }

        tx.commit().await?;

        info!(
            tenant_id,
            quote_id = %quote.id,
            quote_number = %quote.number,
            order_id = %order.header.id,
            order_number = %order.header.number,
            "Quote converted to order"
        );

        Ok(order)
    }
}

/// Fetches a quote header scoped to the tenant, or NotFound.
async fn fetch_quote(
    conn: &mut sqlx::SqliteConnection,
    tenant_id: &str,
    quote_id: &str,
) -> EngineResult<Quote> {
    let quote = sqlx::query_as::<_, Quote>(&format!(
        "SELECT {} FROM quotes WHERE id = ? AND tenant_id = ?",
        crate::repository::quote::QUOTE_COLUMNS
    ))
    .bind(quote_id)
    .bind(tenant_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| CoreError::not_found("Quote", quote_id))?;

    Ok(quote)
}

// =============================================================================
// Integration Tests
// =============================================================================
