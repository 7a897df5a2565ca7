//! # Client Repository
//!
//! Read access to registered clients. Client identity is owned by an external
//! CRM surface; the engine only ever resolves and snapshots it.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use mercantile_core::Client;

const CLIENT_COLUMNS: &str =
    "id, tenant_id, name, tax_id, email, phone, created_at, updated_at";

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Gets a client by ID, scoped to the tenant.
    pub async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ? AND tenant_id = ?"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Lists a tenant's clients, sorted by name.
    pub async fn list(&self, tenant_id: &str, limit: u32) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients \
             WHERE tenant_id = ? ORDER BY name LIMIT ?"
        ))
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Inserts a new client (seeding and tests).
    pub async fn insert(&self, client: &Client) -> DbResult<()> {
        debug!(name = %client.name, tenant_id = %client.tenant_id, "Inserting client");

        sqlx::query(
            "INSERT INTO clients (
                id, tenant_id, name, tax_id, email, phone, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&client.id)
        .bind(&client.tenant_id)
        .bind(&client.name)
        .bind(&client.tax_id)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Helper to generate a new client ID.
pub fn generate_client_id() -> String {
    Uuid::new_v4().to_string()
}
