//! # Tenant-Scoped Lookups
//!
//! Every foreign reference carried by an input (line products, registered
//! clients) is re-resolved inside the transaction and checked against the
//! caller's tenant before it is written onto a document. A reference that
//! exists but belongs to another tenant is rejected as a cross-tenant
//! reference, never silently treated as missing.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::EngineError;
use mercantile_core::{Client, ClientRef, CoreError, Product};

use super::ClientColumns;

/// Fetches a product and proves it belongs to the tenant.
pub(crate) async fn product_for_tenant(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    product_id: &str,
) -> Result<Product, EngineError> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, tenant_id, sku, name, stock_quantity, cost_cents, price_cents, \
         is_active, created_at, updated_at FROM products WHERE id = ?",
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| CoreError::not_found("Product", product_id))?;

    if product.tenant_id != tenant_id {
        debug!(product_id, tenant_id, "Rejected cross-tenant product reference");
        return Err(CoreError::cross_tenant("Product", product_id, tenant_id).into());
    }

    Ok(product)
}

/// Fetches a registered client and proves it belongs to the tenant.
pub(crate) async fn client_for_tenant(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    client_id: &str,
) -> Result<Client, EngineError> {
    let client = sqlx::query_as::<_, Client>(
        "SELECT id, tenant_id, name, tax_id, email, phone, created_at, updated_at \
         FROM clients WHERE id = ?",
    )
    .bind(client_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| CoreError::not_found("Client", client_id))?;

    if client.tenant_id != tenant_id {
        debug!(client_id, tenant_id, "Rejected cross-tenant client reference");
        return Err(CoreError::cross_tenant("Client", client_id, tenant_id).into());
    }

    Ok(client)
}

/// Resolves an optional client reference into header columns.
///
/// A registered reference stores only the client ID; a direct client is
/// snapshotted verbatim onto the document. `None` produces all-null columns
/// (anonymous walk-in).
pub(crate) async fn resolve_client(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    client: Option<&ClientRef>,
) -> Result<ClientColumns, EngineError> {
    match client {
        None => Ok(ClientColumns::default()),
        Some(ClientRef::Registered { client_id }) => {
            let client = client_for_tenant(conn, tenant_id, client_id).await?;
            Ok(ClientColumns {
                client_id: Some(client.id),
                ..ClientColumns::default()
            })
        }
        Some(ClientRef::Direct { name, email, phone }) => Ok(ClientColumns {
            client_id: None,
            direct_name: Some(name.clone()),
            direct_email: email.clone(),
            direct_phone: phone.clone(),
        }),
    }
}
