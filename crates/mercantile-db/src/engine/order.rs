//! # Order Workflows
//!
//! Creation and status progression of orders. Orders never touch stock;
//! fulfillment inventory is tracked outside this engine.
//!
//! The header+lines write path is shared between direct entry
//! (`create_order`) and quote conversion (`convert_quote_to_order`), so both
//! produce identical rows apart from `origin_quote_id`.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::engine::{
    generate_id, lookup, map_number_collision, numbering, ClientColumns, CommerceEngine,
};
use crate::error::EngineResult;
use mercantile_core::validation;
use mercantile_core::{
    CoreError, CreateOrderInput, DocumentKind, DocumentTotals, LineInput, Order, OrderDocument,
    OrderLine, OrderStatus,
};

/// Inserts an order header plus lines inside the caller's transaction.
///
/// Line products are re-resolved tenant-scoped here, so the conversion path
/// gets the same cross-tenant protection as direct entry.
pub(crate) async fn write_order(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    client: ClientColumns,
    totals: DocumentTotals,
    notes: Option<String>,
    origin_quote_id: Option<String>,
    lines: &[LineInput],
) -> EngineResult<OrderDocument> {
    let now = Utc::now();
    let order_id = generate_id();

    let mut order_lines = Vec::with_capacity(lines.len());
    for line in lines {
        let product = lookup::product_for_tenant(&mut *conn, tenant_id, &line.product_id).await?;
        order_lines.push(OrderLine {
            id: generate_id(),
            order_id: order_id.clone(),
            product_id: product.id,
            quantity: line.quantity,
            unit_price_cents: line.unit_price_cents,
            subtotal_cents: line.subtotal_cents,
            discount_cents: line.discount_cents,
            created_at: now,
        });
    }

    let number = numbering::next_document_number(&mut *conn, tenant_id, DocumentKind::Order).await?;

    let header = Order {
        id: order_id,
        tenant_id: tenant_id.to_string(),
        number,
        client_id: client.client_id,
        direct_client_name: client.direct_name,
        direct_client_email: client.direct_email,
        direct_client_phone: client.direct_phone,
        origin_quote_id,
        status: OrderStatus::Pending,
        completed: false,
        subtotal_cents: totals.subtotal_cents,
        discount_cents: totals.discount_cents,
        tax_cents: totals.tax_cents,
        total_cents: totals.total_cents,
        notes,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO orders (
            id, tenant_id, number, client_id, direct_client_name, direct_client_email,
            direct_client_phone, origin_quote_id, status, completed, subtotal_cents,
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
    .bind(&header.origin_quote_id)
    .bind(header.status)
    .bind(header.completed)
    .bind(header.subtotal_cents)
    .bind(header.discount_cents)
    .bind(header.tax_cents)
    .bind(header.total_cents)
    .bind(&header.notes)
    .bind(header.created_at)
    .bind(header.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_number_collision(e.into(), "Order", &header.number))?;

    for line in &order_lines {
        sqlx::query(
            "INSERT INTO order_lines (
                id, order_id, product_id, quantity, unit_price_cents,
                subtotal_cents, discount_cents, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&line.id)
        .bind(&line.order_id)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.subtotal_cents)
        .bind(line.discount_cents)
        .bind(line.created_at)
        .execute(&mut *conn)
        .await?;
    }

    Ok(OrderDocument {
        header,
        lines: order_lines,
    })
}

impl CommerceEngine {
    /// Creates an order by direct entry, in one atomic unit.
    pub async fn create_order(
        &self,
        tenant_id: &str,
        input: CreateOrderInput,
    ) -> EngineResult<OrderDocument> {
        validation::validate_create_order(&input)?;
        debug!(tenant_id, lines = input.lines.len(), "Creating order");

        let mut tx = self.pool().begin().await?;

        let client = lookup::resolve_client(&mut tx, tenant_id, input.client.as_ref()).await?;
        let document = write_order(
            &mut tx,
            tenant_id,
            client,
            input.totals,
            input.notes,
            None,
            &input.lines,
        )
        .await?;

        tx.commit().await?;

        info!(
            tenant_id,
            order_id = %document.header.id,
            number = %document.header.number,
            "Order created"
        );

        Ok(document)
    }

    /// Moves an order along its state machine
    /// (pending → in_progress → completed).
    pub async fn update_order_status(
        &self,
        tenant_id: &str,
        order_id: &str,
        status: OrderStatus,
    ) -> EngineResult<Order> {
        debug!(tenant_id, order_id, status = status.as_str(), "Updating order status");

        let mut tx = self.pool().begin().await?;

        let mut order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = ? AND tenant_id = ?",
            crate::repository::order::ORDER_COLUMNS
        ))
        .bind(order_id)
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::not_found("Order", order_id))?;

        if !order.status.can_transition_to(status) {
            return Err(CoreError::InvalidStatusTransition {
                document: "Order",
                id: order.id,
                from: order.status.as_str().to_string(),
                to: status.as_str().to_string(),
            }
            .into());
        }

        let now = Utc::now();
        sqlx::query("UPDATE orders SET status = ?, completed = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(status.is_completed())
            .bind(now)
            .bind(&order.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        order.status = status;
        order.completed = status.is_completed();
        order.updated_at = now;

        info!(
            tenant_id,
            order_id = %order.id,
            status = order.status.as_str(),
            "Order status updated"
        );

        Ok(order)
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Utc};

    use crate::engine::harness::*;
    use crate::error::EngineError;
    use mercantile_core::{CoreError, OrderStatus};

    #[tokio::test]
    async fn test_create_order_never_touches_stock() {
        let db = test_db().await;
        let product = seed_product(&db, TENANT_A, "A-1", 10, 500).await;

        let order = db
            .engine()
            .create_order(TENANT_A, order_input(vec![line(&product, 8)]))
            .await
            .unwrap();

        let year = Utc::now().year();
        assert_eq!(order.header.number, format!("ORD-{year}-001"));
        assert_eq!(order.header.status, OrderStatus::Pending);
        assert!(!order.header.completed);
        assert!(order.header.origin_quote_id.is_none());

        // Even a quantity above current stock is fine: fulfillment stock is
        // tracked outside this engine
        assert_eq!(stock_of(&db, &product.id).await, 10);

        let over = db
            .engine()
            .create_order(TENANT_A, order_input(vec![line(&product, 50)]))
            .await
            .unwrap();
        assert_eq!(over.header.number, format!("ORD-{year}-002"));
        assert_eq!(stock_of(&db, &product.id).await, 10);
    }

    #[tokio::test]
    async fn test_create_order_rejects_cross_tenant_product() {
        let db = test_db().await;
        let foreign = seed_product(&db, TENANT_B, "B-1", 10, 100).await;

        let err = db
            .engine()
            .create_order(TENANT_A, order_input(vec![line(&foreign, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(CoreError::CrossTenantReference { entity: "Product", .. })
        ));
        assert!(db.orders().list_for_tenant(TENANT_A, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_status_progression() {
        let db = test_db().await;
        let product = seed_product(&db, TENANT_A, "A-1", 10, 100).await;
        let order = db
            .engine()
            .create_order(TENANT_A, order_input(vec![line(&product, 1)]))
            .await
            .unwrap();

        let order = db
            .engine()
            .update_order_status(TENANT_A, &order.header.id, OrderStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::InProgress);
        assert!(!order.completed);

        let order = db
            .engine()
            .update_order_status(TENANT_A, &order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.completed);

        // Completed is terminal
        let err = db
            .engine()
            .update_order_status(TENANT_A, &order.id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(CoreError::InvalidStatusTransition { document: "Order", .. })
        ));
    }

    #[tokio::test]
    async fn test_order_can_skip_in_progress() {
        let db = test_db().await;
        let product = seed_product(&db, TENANT_A, "A-1", 10, 100).await;
        let order = db
            .engine()
            .create_order(TENANT_A, order_input(vec![line(&product, 1)]))
            .await
            .unwrap();

        let order = db
            .engine()
            .update_order_status(TENANT_A, &order.header.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert!(order.completed);
    }

    #[tokio::test]
    async fn test_update_order_status_is_tenant_scoped() {
        let db = test_db().await;
        let product = seed_product(&db, TENANT_A, "A-1", 10, 100).await;
        let order = db
            .engine()
            .create_order(TENANT_A, order_input(vec![line(&product, 1)]))
            .await
            .unwrap();

        let err = db
            .engine()
            .update_order_status(TENANT_B, &order.header.id, OrderStatus::InProgress)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(CoreError::NotFound { entity: "Order", .. })
        ));
    }

    #[tokio::test]
    async fn test_order_numbering_is_per_tenant() {
        let db = test_db().await;
        let pa = seed_product(&db, TENANT_A, "A-1", 10, 100).await;
        let pb = seed_product(&db, TENANT_B, "B-1", 10, 100).await;
        let year = Utc::now().year();

        let a1 = db
            .engine()
            .create_order(TENANT_A, order_input(vec![line(&pa, 1)]))
            .await
            .unwrap();
        let b1 = db
            .engine()
            .create_order(TENANT_B, order_input(vec![line(&pb, 1)]))
            .await
            .unwrap();
        let a2 = db
            .engine()
            .create_order(TENANT_A, order_input(vec![line(&pa, 1)]))
            .await
            .unwrap();

        // Each tenant gets its own sequence; nothing leaks across
        assert_eq!(a1.header.number, format!("ORD-{year}-001"));
        assert_eq!(b1.header.number, format!("ORD-{year}-001"));
        assert_eq!(a2.header.number, format!("ORD-{year}-002"));
    }
}
