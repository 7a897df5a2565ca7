//! # mercantile-core: Pure Business Logic for Mercantile
//!
//! This crate is the **heart** of the Mercantile commerce engine. It contains
//! all business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mercantile Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Caller (HTTP layer, out of this workspace)           │   │
//! │  │      supplies a validated tenant id + typed input DTOs          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              mercantile-db (storage + engine)                   │   │
//! │  │    transactions, repositories, stock ledger, numbering          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mercantile-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────┐     │   │
//! │  │   │   types   │ │   money   │ │ numbering │ │ validation│     │   │
//! │  │   │ Sale/Order│ │   Money   │ │ SAL-0001  │ │   rules   │     │   │
//! │  │   │  /Quote   │ │  (cents)  │ │ORD-2026-..│ │  checks   │     │   │
//! │  │   └───────────┘ └───────────┘ └───────────┘ └───────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Client, Sale, Order, Quote, statuses)
//! - [`input`] - Input DTOs crossing the engine boundary
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`numbering`] - Document number formats (sequential and year-scoped)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Closed State Machines**: Status transitions are enumerated, never ad-hoc flags

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod input;
pub mod money;
pub mod numbering;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mercantile_core::Money` instead of
// `use mercantile_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use input::*;
pub use money::Money;
pub use numbering::DocumentKind;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of line items allowed on a single document.
///
/// ## Business Reason
/// Prevents runaway documents and keeps a single atomic unit bounded.
/// Can be made configurable per-tenant in future versions.
pub const MAX_DOCUMENT_LINES: usize = 200;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 100000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 99_999;
