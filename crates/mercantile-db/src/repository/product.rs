//! # Product Repository
//!
//! Read access to the product catalog, plus inserts for seeding. The catalog
//! is a read dependency of the commerce engine: stock is mutated only by the
//! engine's stock ledger, and products are never deleted, only deactivated.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mercantile_core::Product;

const PRODUCT_COLUMNS: &str = "id, tenant_id, sku, name, stock_quantity, cost_cents, \
     price_cents, is_active, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID, scoped to the tenant.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found and belongs to the tenant
    /// * `Ok(None)` - No such product visible to this tenant
    pub async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ? AND tenant_id = ?"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists active products of a tenant, sorted by name.
    pub async fn list_active(&self, tenant_id: &str, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE tenant_id = ? AND is_active = 1 \
             ORDER BY name LIMIT ?"
        ))
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// Catalog CRUD proper is an external collaborator; this exists for
    /// seeding and tests.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - SKU already exists for the tenant
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(sku = %product.sku, tenant_id = %product.tenant_id, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                id, tenant_id, sku, name, stock_quantity, cost_cents,
                price_cents, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.id)
        .bind(&product.tenant_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.stock_quantity)
        .bind(product.cost_cents)
        .bind(product.price_cents)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deactivates a product (soft delete).
    ///
    /// ## Why Soft Delete?
    /// Historical document lines still reference this product.
    pub async fn deactivate(&self, tenant_id: &str, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ? \
             WHERE id = ? AND tenant_id = ?",
        )
        .bind(now)
        .bind(id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}
