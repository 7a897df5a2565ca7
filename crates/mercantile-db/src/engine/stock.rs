//! # Stock Ledger
//!
//! The only two stock movements in the model:
//!
//! ```text
//! reserve  sale creation      stock_quantity -= qty   (guarded, may fail)
//! release  sale cancellation  stock_quantity += qty   (always succeeds)
//! ```
//!
//! `reserve` decrements with a `stock_quantity >= qty` guard in the UPDATE
//! itself, then checks `rows_affected`. Combined with the schema-level
//! `CHECK (stock_quantity >= 0)`, stock can never observably go negative
//! even when two sales race for the last units.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::EngineError;
use mercantile_core::{CoreError, Product};

/// Reserves `quantity` units of a product, failing without side effects when
/// stock is insufficient.
pub(crate) async fn reserve(
    conn: &mut SqliteConnection,
    product: &Product,
    quantity: i64,
) -> Result<(), EngineError> {
    if !product.has_stock_for(quantity) {
        return Err(CoreError::InsufficientStock {
            sku: product.sku.clone(),
            available: product.stock_quantity,
            requested: quantity,
        }
        .into());
    }

    let result = sqlx::query(
        "UPDATE products SET stock_quantity = stock_quantity - ?, \
         updated_at = CURRENT_TIMESTAMP \
         WHERE id = ? AND stock_quantity >= ?",
    )
    .bind(quantity)
    .bind(&product.id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    // The pre-check read may be stale under concurrency; the guard is the
    // authoritative answer.
    if result.rows_affected() == 0 {
        return Err(CoreError::InsufficientStock {
            sku: product.sku.clone(),
            available: product.stock_quantity,
            requested: quantity,
        }
        .into());
    }

    debug!(sku = %product.sku, quantity, "Reserved stock");
    Ok(())
}

/// Releases `quantity` units back to a product (sale cancellation).
pub(crate) async fn release(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> Result<(), EngineError> {
    let result = sqlx::query(
        "UPDATE products SET stock_quantity = stock_quantity + ?, \
         updated_at = CURRENT_TIMESTAMP \
         WHERE id = ?",
    )
    .bind(quantity)
    .bind(product_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CoreError::not_found("Product", product_id).into());
    }

    debug!(product_id, quantity, "Released stock");
    Ok(())
}
