//! # Input DTOs
//!
//! Typed inputs crossing the engine boundary.
//!
//! ## Closed Update Payloads
//! Update payloads enumerate exactly the mutable fields of each document
//! type. There is no generic patch path, so immutable fields (tenant id,
//! document number, conversion flag) are unreachable from any caller input.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Client Reference
// =============================================================================

/// How a document identifies its client.
///
/// Either a registered client id (validated against the tenant) or an inline
/// snapshot for walk-in/direct clients. A document may also carry no client
/// at all; that is a valid state, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ClientRef {
    /// Reference to a registered client of the same tenant.
    Registered { client_id: String },
    /// Inline snapshot when no registered client exists.
    Direct {
        name: String,
        email: Option<String>,
        phone: Option<String>,
    },
}

// =============================================================================
// Line Input
// =============================================================================

/// One line item of a document being created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInput {
    pub product_id: String,
    /// Positive integer quantity.
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// Computed line subtotal, caller-supplied.
    pub subtotal_cents: i64,
    pub discount_cents: i64,
}

// =============================================================================
// Document Totals
// =============================================================================

/// Header totals, caller-supplied and trusted (documented gap: the engine
/// does not re-derive them from lines).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DocumentTotals {
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

// =============================================================================
// Create Inputs
// =============================================================================

/// Input for creating a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSaleInput {
    pub client: Option<ClientRef>,
    pub lines: Vec<LineInput>,
    pub totals: DocumentTotals,
    /// Opaque payment-method reference; gateways are out of scope.
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Input for creating an order by direct entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderInput {
    pub client: Option<ClientRef>,
    pub lines: Vec<LineInput>,
    pub totals: DocumentTotals,
    pub notes: Option<String>,
}

/// Input for creating a quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuoteInput {
    pub client: Option<ClientRef>,
    pub lines: Vec<LineInput>,
    pub totals: DocumentTotals,
    /// Date the quoted prices remain valid through.
    pub validity_date: NaiveDate,
    pub notes: Option<String>,
}

// =============================================================================
// Update Inputs
// =============================================================================

/// Closed update payload for a quote.
///
/// Only non-structural header fields are mutable; lines, totals, the number
/// and the conversion flag are not. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQuoteInput {
    pub validity_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub client: Option<ClientRef>,
}

impl UpdateQuoteInput {
    /// True when the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.validity_date.is_none() && self.notes.is_none() && self.client.is_none()
    }
}

// =============================================================================
// Stats Period
// =============================================================================

/// Bounded time window for sales statistics (inclusive start, exclusive end).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatsPeriod {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}
