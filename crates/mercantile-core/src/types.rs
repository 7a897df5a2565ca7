//! # Domain Types
//!
//! Core domain types used throughout Mercantile.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Client      │   │     Sale        │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  name, tax_id   │   │  number SAL-NNNN│       │
//! │  │  stock_quantity │   │  contact        │   │  status, totals │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ 1:N            │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │     Quote       │──►│     Order       │   │    SaleLine     │       │
//! │  │  QUO-YYYY-NNN   │   │  ORD-YYYY-NNN   │   │  product, qty   │       │
//! │  │  converted flag │   │  origin_quote_id│   │  price, subtotal│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │         conversion (one-way, at most once)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every document has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `number`: human-readable sequential identifier, unique per tenant
//!
//! ## Tenant Isolation
//! Every row carries a `tenant_id`; a document's lines may only reference
//! products of the same tenant. That invariant is enforced by the engine in
//! `mercantile-db`, not here; these are plain data carriers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in a tenant's catalog.
///
/// Mutated exclusively by the stock ledger (decrement on sale commit,
/// increment on sale cancellation) from this engine's perspective; catalog
/// management is an external collaborator. Never deleted, only deactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this product belongs to.
    pub tenant_id: String,

    /// Stock Keeping Unit - business identifier, unique per tenant.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Current stock level. Invariant: never negative after a ledger op.
    pub stock_quantity: i64,

    /// Unit cost in cents (for margin calculations).
    pub cost_cents: Option<i64>,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Whether the product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` units could be sold from current stock.
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// Client
// =============================================================================

/// A registered client of a tenant.
///
/// Read-only from the engine's perspective. Documents may instead carry an
/// inline direct-client snapshot when no registered client exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    /// Tax identifier (RFC/VAT/EIN depending on jurisdiction).
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale document.
///
/// ## State Machine
/// ```text
/// active ──cancel──► cancelled (terminal, restores stock)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale is committed and counts toward stock and stats.
    Active,
    /// Sale was cancelled; its stock reservations were released.
    Cancelled,
}

impl SaleStatus {
    /// Transition table for the sale state machine.
    pub fn can_transition_to(&self, target: SaleStatus) -> bool {
        matches!((self, target), (SaleStatus::Active, SaleStatus::Cancelled))
    }

    /// Stable string form, matching the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Active => "active",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Active
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order document.
///
/// ## State Machine
/// ```text
/// pending ──► in_progress ──► completed (terminal)
///    └────────────────────────────┘
/// ```
/// No cancellation path is modeled for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
}

impl OrderStatus {
    /// Transition table for the order state machine.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (OrderStatus::Pending, OrderStatus::InProgress)
                | (OrderStatus::Pending, OrderStatus::Completed)
                | (OrderStatus::InProgress, OrderStatus::Completed)
        )
    }

    /// Stable string form, matching the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
        }
    }

    /// The derived `completed` flag kept consistent with the status.
    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Quote Status
// =============================================================================

/// The status of a quote document.
///
/// ## State Machine
/// ```text
/// pending ──► accepted ──convert──► converted (terminal)
///    │            │
///    │            └──────────┐
///    ├──► rejected           │
///    └───────convert─────────► converted
/// ```
/// `accepted`/`rejected` are informational; only `convert` produces an order,
/// and it is the only operation allowed to reach `converted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    Accepted,
    Rejected,
    Converted,
}

impl QuoteStatus {
    /// Transition table for the quote state machine.
    ///
    /// `Converted` is reachable from `Pending` and `Accepted`, but only the
    /// convert operation may request that target; plain status updates must
    /// refuse it before consulting this table.
    pub fn can_transition_to(&self, target: QuoteStatus) -> bool {
        matches!(
            (self, target),
            (QuoteStatus::Pending, QuoteStatus::Accepted)
                | (QuoteStatus::Pending, QuoteStatus::Rejected)
                | (QuoteStatus::Pending, QuoteStatus::Converted)
                | (QuoteStatus::Accepted, QuoteStatus::Converted)
        )
    }

    /// Stable string form, matching the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Converted => "converted",
        }
    }

    /// Terminal states accept no further mutation of any kind.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, QuoteStatus::Converted)
    }
}

impl Default for QuoteStatus {
    fn default() -> Self {
        QuoteStatus::Pending
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale document header.
///
/// Created once with all of its lines in one atomic unit; afterwards only the
/// status may change (cancellation). Never physically deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub tenant_id: String,
    /// Sequential business number, e.g. `SAL-0042`. Unique per tenant.
    pub number: String,
    /// Registered client reference; mutually exclusive with the snapshot.
    pub client_id: Option<String>,
    /// Direct-client snapshot when no registered client exists.
    pub direct_client_name: Option<String>,
    pub direct_client_email: Option<String>,
    pub direct_client_phone: Option<String>,
    pub status: SaleStatus,
    /// Header totals are caller-supplied and trusted; the engine does not
    /// re-derive them from lines.
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    /// Opaque payment-method reference (gateways are out of scope).
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in a sale. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    /// Referenced product; must share the sale's tenant.
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleLine {
    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order document header.
///
/// Created by direct entry or by quote conversion. Orders do not touch stock
/// in this model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub tenant_id: String,
    /// Year-scoped business number, e.g. `ORD-2026-007`. Unique per tenant.
    pub number: String,
    pub client_id: Option<String>,
    pub direct_client_name: Option<String>,
    pub direct_client_email: Option<String>,
    pub direct_client_phone: Option<String>,
    /// Back-reference to the originating quote; set only by conversion.
    pub origin_quote_id: Option<String>,
    pub status: OrderStatus,
    /// Derived flag, kept consistent with `status` by the engine.
    pub completed: bool,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item in an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Quote
// =============================================================================

/// A quote document header.
///
/// Terminal once converted: the conversion flag goes false→true exactly once
/// and only through the convert operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Quote {
    pub id: String,
    pub tenant_id: String,
    /// Year-scoped business number, e.g. `QUO-2026-003`. Unique per tenant.
    pub number: String,
    pub client_id: Option<String>,
    pub direct_client_name: Option<String>,
    pub direct_client_email: Option<String>,
    pub direct_client_phone: Option<String>,
    /// Date the quoted prices remain valid through.
    pub validity_date: NaiveDate,
    pub status: QuoteStatus,
    /// Conversion flag: false→true at most once, irreversible.
    pub converted: bool,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item in a quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct QuoteLine {
    pub id: String,
    pub quote_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Materialized Documents
// =============================================================================

/// A sale header together with its ordered lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDocument {
    pub header: Sale,
    pub lines: Vec<SaleLine>,
}

/// An order header together with its ordered lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDocument {
    pub header: Order,
    pub lines: Vec<OrderLine>,
}

/// A quote header together with its ordered lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDocument {
    pub header: Quote,
    pub lines: Vec<QuoteLine>,
}

// =============================================================================
// Sales Statistics
// =============================================================================

/// Read-only aggregate over active sales in a bounded time window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SalesStats {
    /// Number of active sales in the window.
    pub count: i64,
    /// Sum of sale totals.
    pub total: Money,
    /// Average sale total (truncated; zero when count is zero).
    pub average: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_transitions() {
        assert!(SaleStatus::Active.can_transition_to(SaleStatus::Cancelled));
        assert!(!SaleStatus::Cancelled.can_transition_to(SaleStatus::Active));
        assert!(!SaleStatus::Active.can_transition_to(SaleStatus::Active));
    }

    #[test]
    fn test_order_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::InProgress));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::InProgress.can_transition_to(OrderStatus::Completed));

        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::InProgress));
        assert!(!OrderStatus::InProgress.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_order_completed_flag() {
        assert!(OrderStatus::Completed.is_completed());
        assert!(!OrderStatus::Pending.is_completed());
        assert!(!OrderStatus::InProgress.is_completed());
    }

    #[test]
    fn test_quote_transitions() {
        assert!(QuoteStatus::Pending.can_transition_to(QuoteStatus::Accepted));
        assert!(QuoteStatus::Pending.can_transition_to(QuoteStatus::Rejected));
        assert!(QuoteStatus::Pending.can_transition_to(QuoteStatus::Converted));
        assert!(QuoteStatus::Accepted.can_transition_to(QuoteStatus::Converted));

        assert!(!QuoteStatus::Rejected.can_transition_to(QuoteStatus::Converted));
        assert!(!QuoteStatus::Converted.can_transition_to(QuoteStatus::Pending));
        assert!(!QuoteStatus::Converted.can_transition_to(QuoteStatus::Accepted));
    }

    #[test]
    fn test_quote_terminal() {
        assert!(QuoteStatus::Converted.is_terminal());
        assert!(!QuoteStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_product_has_stock_for() {
        let now = Utc::now();
        let product = Product {
            id: "p-1".into(),
            tenant_id: "t-1".into(),
            sku: "COKE-330".into(),
            name: "Coca-Cola 330ml".into(),
            stock_quantity: 10,
            cost_cents: Some(40),
            price_cents: 150,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        assert!(product.has_stock_for(10));
        assert!(!product.has_stock_for(11));
    }
}
