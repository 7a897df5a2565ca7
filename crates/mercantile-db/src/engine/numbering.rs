//! # Counter Allocation
//!
//! Allocates the next document sequence value from the `document_counters`
//! table with a single atomic upsert:
//!
//! ```text
//! INSERT .. VALUES (tenant, kind, year, 1)
//!   ON CONFLICT DO UPDATE SET value = value + 1
//!   RETURNING value
//! ```
//!
//! One statement, no read-modify-write gap, so two transactions racing for
//! the same scope serialize on the counter row and never observe the same
//! value. Counters are scoped `(tenant_id, doc_type, year)`; kinds without a
//! year component use year 0.

use chrono::{Datelike, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::EngineError;
use mercantile_core::DocumentKind;

/// Allocates and formats the next document number for a tenant.
///
/// Must run inside the same transaction as the header insert: if the insert
/// fails, the counter increment rolls back with it and the sequence stays
/// gapless.
pub(crate) async fn next_document_number(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    kind: DocumentKind,
) -> Result<String, EngineError> {
    let year = if kind.is_year_scoped() {
        Utc::now().year()
    } else {
        0
    };

    let sequence: i64 = sqlx::query_scalar(
        "INSERT INTO document_counters (tenant_id, doc_type, year, value) \
         VALUES (?, ?, ?, 1) \
         ON CONFLICT (tenant_id, doc_type, year) DO UPDATE SET value = value + 1 \
         RETURNING value",
    )
    .bind(tenant_id)
    .bind(kind.as_str())
    .bind(year)
    .fetch_one(&mut *conn)
    .await?;

    let number = kind.format_number(year, sequence);
    debug!(tenant_id, kind = kind.as_str(), %number, "Allocated document number");

    Ok(number)
}
