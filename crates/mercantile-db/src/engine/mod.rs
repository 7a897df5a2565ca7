//! # Commerce Engine
//!
//! The transactional write side of Mercantile: creation and mutation of
//! sales, orders and quotes, keeping stock quantities, document numbering and
//! cross-document conversion consistent under a multi-step, multi-table
//! write model.
//!
//! ## Workflow Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  One Workflow = One Atomic Unit                         │
//! │                                                                         │
//! │  pool.begin()                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Tenant-scoped lookup ──► client + EVERY line product        (lookup)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Stock ledger reserve (sale path only)                       (stock)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Allocate document number (atomic counter row)               (numbering)│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Insert header + lines                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tx.commit()          ← any failure above drops the tx = rollback      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No operation suspends mid-transaction waiting on another operation;
//! concurrency comes entirely from independent callers opening independent
//! units against the same tables.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DbError, EngineError};

pub mod lookup;
pub mod numbering;
pub mod order;
pub mod quote;
pub mod sale;
pub mod stock;

// =============================================================================
// Commerce Engine
// =============================================================================

/// Entry point for all commerce workflows.
///
/// Cheap to clone; holds only the pool. Every public method is one
/// request-scoped atomic unit (or a plain read for stats).
///
/// The caller is trusted to supply a validated tenant id and to have already
/// enforced authorization and plan quotas.
#[derive(Debug, Clone)]
pub struct CommerceEngine {
    pool: SqlitePool,
}

impl CommerceEngine {
    /// Creates a new CommerceEngine.
    pub fn new(pool: SqlitePool) -> Self {
        CommerceEngine { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// Client columns written onto a document header: either a registered client
/// reference or a direct-client snapshot (or neither).
#[derive(Debug, Clone, Default)]
pub(crate) struct ClientColumns {
    pub client_id: Option<String>,
    pub direct_name: Option<String>,
    pub direct_email: Option<String>,
    pub direct_phone: Option<String>,
}

/// Generates a new document/line ID.
pub(crate) fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Rewrites a unique violation on a document-number index into a
/// [`EngineError::NumberCollision`], so a retry layer can regenerate instead
/// of reporting a generic duplicate.
pub(crate) fn map_number_collision(
    err: EngineError,
    document: &'static str,
    number: &str,
) -> EngineError {
    match err {
        EngineError::Db(DbError::UniqueViolation { ref field, .. })
            if field.contains("number") =>
        {
            EngineError::NumberCollision {
                document,
                number: number.to_string(),
            }
        }
        other => other,
    }
}

// =============================================================================
// Test Harness
// =============================================================================

#[cfg(test)]
pub(crate) mod harness {
    use chrono::{Duration, Utc};

    use crate::pool::{Database, DbConfig};
    use mercantile_core::{
        Client, CreateOrderInput, CreateQuoteInput, CreateSaleInput, DocumentTotals, LineInput,
        Product,
    };

    pub(crate) const TENANT_A: &str = "tenant-a";
    pub(crate) const TENANT_B: &str = "tenant-b";

    /// Fresh in-memory database with migrations applied.
    pub(crate) async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Inserts a product and returns it.
    pub(crate) async fn seed_product(
        db: &Database,
        tenant_id: &str,
        sku: &str,
        stock: i64,
        price_cents: i64,
    ) -> Product {
        let now = Utc::now();
        let product = Product {
            id: super::generate_id(),
            tenant_id: tenant_id.to_string(),
            sku: sku.to_string(),
            name: format!("Product {sku}"),
            stock_quantity: stock,
            cost_cents: None,
            price_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    /// Inserts a registered client and returns it.
    pub(crate) async fn seed_client(db: &Database, tenant_id: &str, name: &str) -> Client {
        let now = Utc::now();
        let client = Client {
            id: super::generate_id(),
            tenant_id: tenant_id.to_string(),
            name: name.to_string(),
            tax_id: None,
            email: None,
            phone: None,
            created_at: now,
            updated_at: now,
        };
        db.clients().insert(&client).await.unwrap();
        client
    }

    pub(crate) fn line(product: &Product, quantity: i64) -> LineInput {
        LineInput {
            product_id: product.id.clone(),
            quantity,
            unit_price_cents: product.price_cents,
            subtotal_cents: product.price_cents * quantity,
            discount_cents: 0,
        }
    }

    pub(crate) fn totals_for(lines: &[LineInput]) -> DocumentTotals {
        let subtotal: i64 = lines.iter().map(|l| l.subtotal_cents).sum();
        DocumentTotals {
            subtotal_cents: subtotal,
            discount_cents: 0,
            tax_cents: 0,
            total_cents: subtotal,
        }
    }

    pub(crate) fn sale_input(lines: Vec<LineInput>) -> CreateSaleInput {
        let totals = totals_for(&lines);
        CreateSaleInput {
            client: None,
            lines,
            totals,
            payment_method: Some("cash".to_string()),
            notes: None,
        }
    }

    pub(crate) fn order_input(lines: Vec<LineInput>) -> CreateOrderInput {
        let totals = totals_for(&lines);
        CreateOrderInput {
            client: None,
            lines,
            totals,
            notes: None,
        }
    }

    pub(crate) fn quote_input(lines: Vec<LineInput>) -> CreateQuoteInput {
        let totals = totals_for(&lines);
        CreateQuoteInput {
            client: None,
            lines,
            totals,
            validity_date: (Utc::now() + Duration::days(30)).date_naive(),
            notes: None,
        }
    }

    /// Current stock as stored, bypassing the domain layer.
    pub(crate) async fn stock_of(db: &Database, product_id: &str) -> i64 {
        sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_one(db.pool())
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_number_collision_only_rewrites_number_indexes() {
        let err = EngineError::Db(DbError::UniqueViolation {
            field: "sales.number".to_string(),
            value: "unknown".to_string(),
        });
        assert!(matches!(
            map_number_collision(err, "Sale", "SAL-0001"),
            EngineError::NumberCollision { document: "Sale", .. }
        ));

        let err = EngineError::Db(DbError::UniqueViolation {
            field: "products.sku".to_string(),
            value: "unknown".to_string(),
        });
        assert!(matches!(
            map_number_collision(err, "Sale", "SAL-0001"),
            EngineError::Db(DbError::UniqueViolation { .. })
        ));
    }
}
