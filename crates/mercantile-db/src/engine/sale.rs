//! # Sale Workflows
//!
//! Creation, cancellation and aggregation of sales. Sales are the only
//! documents that move stock:
//!
//! ```text
//! create_sale   reserve stock per line, allocate SAL number, insert all rows
//! cancel_sale   release stock per line, status active → cancelled
//! sales_stats   COUNT/SUM over active sales in a bounded window
//! ```

use chrono::Utc;
use tracing::{debug, info};

use crate::engine::{generate_id, lookup, map_number_collision, numbering, stock, CommerceEngine};
use crate::error::EngineResult;
use mercantile_core::validation;
use mercantile_core::{
    CoreError, CreateSaleInput, DocumentKind, Money, Sale, SaleDocument, SaleLine, SaleStatus,
    SalesStats, StatsPeriod,
};

impl CommerceEngine {
    /// Creates a sale: header, lines and stock decrements in one atomic unit.
    ///
    /// Any line failure (missing product, cross-tenant reference, stock
    /// shortfall) rolls back every decrement already made for earlier lines.
    pub async fn create_sale(
        &self,
        tenant_id: &str,
        input: CreateSaleInput,
    ) -> EngineResult<SaleDocument> {
        validation::validate_create_sale(&input)?;
        debug!(tenant_id, lines = input.lines.len(), "Creating sale");

        let mut tx = self.pool().begin().await?;

        let client = lookup::resolve_client(&mut tx, tenant_id, input.client.as_ref()).await?;

        let now = Utc::now();
        let sale_id = generate_id();
        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let product = lookup::product_for_tenant(&mut tx, tenant_id, &line.product_id).await?;
            stock::reserve(&mut tx, &product, line.quantity).await?;
            lines.push(SaleLine {
                id: generate_id(),
                sale_id: sale_id.clone(),
                product_id: product.id,
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                subtotal_cents: line.subtotal_cents,
                discount_cents: line.discount_cents,
                created_at: now,
            });
        }

        let number = numbering::next_document_number(&mut tx, tenant_id, DocumentKind::Sale).await?;

        let header = Sale {
            id: sale_id,
            tenant_id: tenant_id.to_string(),
            number,
            client_id: client.client_id,
            direct_client_name: client.direct_name,
            direct_client_email: client.direct_email,
            direct_client_phone: client.direct_phone,
            status: SaleStatus::Active,
            subtotal_cents: input.totals.subtotal_cents,
            discount_cents: input.totals.discount_cents,
            tax_cents: input.totals.tax_cents,
            total_cents: input.totals.total_cents,
            payment_method: input.payment_method,
            notes: input.notes,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        };

        sqlx::query(
            "INSERT INTO sales (
                id, tenant_id, number, client_id, direct_client_name, direct_client_email,
                direct_client_phone, status, subtotal_cents, discount_cents, tax_cents,
                total_cents, payment_method, notes, created_at, updated_at, cancelled_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&header.id)
        .bind(&header.tenant_id)
        .bind(&header.number)
        .bind(&header.client_id)
        .bind(&header.direct_client_name)
        .bind(&header.direct_client_email)
        .bind(&header.direct_client_phone)
        .bind(header.status)
        .bind(header.subtotal_cents)
        .bind(header.discount_cents)
        .bind(header.tax_cents)
        .bind(header.total_cents)
        .bind(&header.payment_method)
        .bind(&header.notes)
        .bind(header.created_at)
        .bind(header.updated_at)
        .bind(header.cancelled_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_number_collision(e.into(), "Sale", &header.number))?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO sale_lines (
                    id, sale_id, product_id, quantity, unit_price_cents,
                    subtotal_cents, discount_cents, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&line.id)
            .bind(&line.sale_id)
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
            sale_id = %header.id,
            number = %header.number,
            total_cents = header.total_cents,
            "Sale created"
        );

        Ok(SaleDocument { header, lines })
    }

    /// Cancels an active sale, restoring every line's stock.
    pub async fn cancel_sale(&self, tenant_id: &str, sale_id: &str) -> EngineResult<Sale> {
        debug!(tenant_id, sale_id, "Cancelling sale");

        let mut tx = self.pool().begin().await?;

        let mut sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {} FROM sales WHERE id = ? AND tenant_id = ?",
            crate::repository::sale::SALE_COLUMNS
        ))
        .bind(sale_id)
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::not_found("Sale", sale_id))?;

        if !sale.status.can_transition_to(SaleStatus::Cancelled) {
            return Err(CoreError::InvalidStatusTransition {
                document: "Sale",
                id: sale.id,
                from: sale.status.as_str().to_string(),
                to: SaleStatus::Cancelled.as_str().to_string(),
            }
            .into());
        }

        let lines = sqlx::query_as::<_, SaleLine>(&format!(
            "SELECT {} FROM sale_lines WHERE sale_id = ? ORDER BY rowid",
            crate::repository::sale::SALE_LINE_COLUMNS
        ))
        .bind(sale_id)
        .fetch_all(&mut *tx)
        .await?;

        for line in &lines {
            stock::release(&mut tx, &line.product_id, line.quantity).await?;
        }

        let now = Utc::now();
        sqlx::query(
            "UPDATE sales SET status = ?, cancelled_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(SaleStatus::Cancelled)
        .bind(now)
        .bind(now)
        .bind(&sale.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        sale.status = SaleStatus::Cancelled;
        sale.cancelled_at = Some(now);
        sale.updated_at = now;

        info!(
            tenant_id,
            sale_id = %sale.id,
            number = %sale.number,
            lines = lines.len(),
            "Sale cancelled, stock restored"
        );

        Ok(sale)
    }

    /// Aggregates a tenant's active sales over a bounded window
    /// (inclusive start, exclusive end). Cancelled sales never count.
    pub async fn sales_stats(
        &self,
        tenant_id: &str,
        period: StatsPeriod,
    ) -> EngineResult<SalesStats> {
        validation::validate_stats_period(&period)?;

        let (count, total_cents): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(total_cents), 0) FROM sales \
             WHERE tenant_id = ? AND status = 'active' \
             AND created_at >= ? AND created_at < ?",
        )
        .bind(tenant_id)
        .bind(period.from)
        .bind(period.to)
        .fetch_one(self.pool())
        .await?;

        let total = Money::from_cents(total_cents);
        Ok(SalesStats {
            count,
            total,
            average: total.div_or_zero(count),
        })
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::engine::harness::*;
    use crate::error::EngineError;
    use mercantile_core::{ClientRef, CoreError, SaleStatus, StatsPeriod};

    #[tokio::test]
    async fn test_create_sale_decrements_stock_and_numbers_sequentially() {
        let db = test_db().await;
        let p1 = seed_product(&db, TENANT_A, "BEV-001", 10, 150).await;
        let p2 = seed_product(&db, TENANT_A, "BEV-002", 4, 300).await;

        let sale = db
            .engine()
            .create_sale(TENANT_A, sale_input(vec![line(&p1, 3), line(&p2, 1)]))
            .await
            .unwrap();

        assert_eq!(sale.header.number, "SAL-0001");
        assert_eq!(sale.header.status, SaleStatus::Active);
        assert_eq!(sale.lines.len(), 2);
        assert_eq!(stock_of(&db, &p1.id).await, 7);
        assert_eq!(stock_of(&db, &p2.id).await, 3);

        // Lines come back in insertion order
        let doc = db
            .sales()
            .get_document(TENANT_A, &sale.header.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.lines[0].product_id, p1.id);
        assert_eq!(doc.lines[1].product_id, p2.id);

        let second = db
            .engine()
            .create_sale(TENANT_A, sale_input(vec![line(&p1, 1)]))
            .await
            .unwrap();
        assert_eq!(second.header.number, "SAL-0002");
    }

    #[tokio::test]
    async fn test_failed_sale_leaves_no_trace() {
        let db = test_db().await;
        let p1 = seed_product(&db, TENANT_A, "A-1", 10, 100).await;
        let p2 = seed_product(&db, TENANT_A, "A-2", 1, 100).await;

        // Second line exceeds stock after the first already decremented
        let err = db
            .engine()
            .create_sale(TENANT_A, sale_input(vec![line(&p1, 5), line(&p2, 3)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(CoreError::InsufficientStock {
                available: 1,
                requested: 3,
                ..
            })
        ));

        // Rollback restored the first line's decrement and wrote no rows
        assert_eq!(stock_of(&db, &p1.id).await, 10);
        assert_eq!(stock_of(&db, &p2.id).await, 1);
        assert!(db.sales().list_for_tenant(TENANT_A, 10).await.unwrap().is_empty());

        // The counter increment rolled back with it: numbering stays gapless
        let sale = db
            .engine()
            .create_sale(TENANT_A, sale_input(vec![line(&p1, 1)]))
            .await
            .unwrap();
        assert_eq!(sale.header.number, "SAL-0001");
    }

    #[tokio::test]
    async fn test_create_sale_rejects_cross_tenant_product() {
        let db = test_db().await;
        let foreign = seed_product(&db, TENANT_B, "B-1", 10, 100).await;

        let err = db
            .engine()
            .create_sale(TENANT_A, sale_input(vec![line(&foreign, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(CoreError::CrossTenantReference { entity: "Product", .. })
        ));
        assert_eq!(stock_of(&db, &foreign.id).await, 10);
    }

    #[tokio::test]
    async fn test_create_sale_client_variants() {
        let db = test_db().await;
        let product = seed_product(&db, TENANT_A, "A-1", 50, 100).await;
        let client = seed_client(&db, TENANT_A, "Acme Retail").await;

        let mut input = sale_input(vec![line(&product, 1)]);
        input.client = Some(ClientRef::Registered {
            client_id: client.id.clone(),
        });
        let sale = db.engine().create_sale(TENANT_A, input).await.unwrap();
        assert_eq!(sale.header.client_id.as_deref(), Some(client.id.as_str()));
        assert!(sale.header.direct_client_name.is_none());

        let mut input = sale_input(vec![line(&product, 1)]);
        input.client = Some(ClientRef::Direct {
            name: "Walk-in".to_string(),
            email: Some("walkin@example.com".to_string()),
            phone: None,
        });
        let sale = db.engine().create_sale(TENANT_A, input).await.unwrap();
        assert!(sale.header.client_id.is_none());
        assert_eq!(sale.header.direct_client_name.as_deref(), Some("Walk-in"));
        assert_eq!(
            sale.header.direct_client_email.as_deref(),
            Some("walkin@example.com")
        );
    }

    #[tokio::test]
    async fn test_create_sale_rejects_foreign_or_missing_client() {
        let db = test_db().await;
        let product = seed_product(&db, TENANT_A, "A-1", 50, 100).await;
        let foreign_client = seed_client(&db, TENANT_B, "Other Shop").await;

        let mut input = sale_input(vec![line(&product, 1)]);
        input.client = Some(ClientRef::Registered {
            client_id: foreign_client.id.clone(),
        });
        let err = db.engine().create_sale(TENANT_A, input).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(CoreError::CrossTenantReference { entity: "Client", .. })
        ));

        let mut input = sale_input(vec![line(&product, 1)]);
        input.client = Some(ClientRef::Registered {
            client_id: crate::engine::generate_id(),
        });
        let err = db.engine().create_sale(TENANT_A, input).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(CoreError::NotFound { entity: "Client", .. })
        ));

        // Client failure aborts before any stock moves
        assert_eq!(stock_of(&db, &product.id).await, 50);
    }

    #[tokio::test]
    async fn test_create_sale_validates_input() {
        let db = test_db().await;

        let err = db
            .engine()
            .create_sale(TENANT_A, sale_input(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_sale_restores_stock_once() {
        let db = test_db().await;
        let product = seed_product(&db, TENANT_A, "A-1", 10, 100).await;

        let sale = db
            .engine()
            .create_sale(TENANT_A, sale_input(vec![line(&product, 4)]))
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &product.id).await, 6);

        let cancelled = db
            .engine()
            .cancel_sale(TENANT_A, &sale.header.id)
            .await
            .unwrap();
        assert_eq!(cancelled.status, SaleStatus::Cancelled);
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(stock_of(&db, &product.id).await, 10);

        // Second cancellation must not restore stock again
        let err = db
            .engine()
            .cancel_sale(TENANT_A, &sale.header.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(CoreError::InvalidStatusTransition { document: "Sale", .. })
        ));
        assert_eq!(stock_of(&db, &product.id).await, 10);
    }

    #[tokio::test]
    async fn test_cancel_sale_is_tenant_scoped() {
        let db = test_db().await;
        let product = seed_product(&db, TENANT_A, "A-1", 10, 100).await;
        let sale = db
            .engine()
            .create_sale(TENANT_A, sale_input(vec![line(&product, 1)]))
            .await
            .unwrap();

        let err = db
            .engine()
            .cancel_sale(TENANT_B, &sale.header.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(CoreError::NotFound { entity: "Sale", .. })
        ));
    }

    #[tokio::test]
    async fn test_sales_stats_counts_only_active_in_window() {
        let db = test_db().await;
        let product = seed_product(&db, TENANT_A, "A-1", 100, 250).await;
        let engine = db.engine();

        let s1 = engine
            .create_sale(TENANT_A, sale_input(vec![line(&product, 2)]))
            .await
            .unwrap();
        engine
            .create_sale(TENANT_A, sale_input(vec![line(&product, 4)]))
            .await
            .unwrap();
        engine
            .create_sale(TENANT_A, sale_input(vec![line(&product, 6)]))
            .await
            .unwrap();

        // Another tenant's sale never leaks into the aggregate
        let foreign = seed_product(&db, TENANT_B, "B-1", 100, 999).await;
        engine
            .create_sale(TENANT_B, sale_input(vec![line(&foreign, 1)]))
            .await
            .unwrap();

        engine.cancel_sale(TENANT_A, &s1.header.id).await.unwrap();

        let now = Utc::now();
        let window = StatsPeriod {
            from: now - Duration::hours(1),
            to: now + Duration::hours(1),
        };
        let stats = engine.sales_stats(TENANT_A, window).await.unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total.cents(), 250 * 4 + 250 * 6);
        assert_eq!(stats.average.cents(), (250 * 4 + 250 * 6) / 2);

        // Empty window: zero count, zero average (no division blowup)
        let empty = StatsPeriod {
            from: now - Duration::days(30),
            to: now - Duration::days(29),
        };
        let stats = engine.sales_stats(TENANT_A, empty).await.unwrap();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.total.cents(), 0);
        assert_eq!(stats.average.cents(), 0);
    }
}
