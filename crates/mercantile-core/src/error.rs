//! # Error Types
//!
//! Domain-specific error types for mercantile-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mercantile-core errors (this file)                                    │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mercantile-db errors (separate crate)                                 │
//! │  ├── DbError          - Storage operation failures                     │
//! │  └── EngineError      - Workflow failures (Core + Db + collisions)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (document type, sku, id, ...)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations detected while a workflow
/// runs. Any of them aborts (rolls back) the enclosing atomic unit.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A referenced entity exists under another tenant, or not at all.
    ///
    /// ## When This Occurs
    /// - A sale/order/quote line references a product of another tenant
    /// - The header client id belongs to another tenant
    /// - The reference points at nothing (deleted or mistyped id)
    ///
    /// Both cases are reported identically so a caller cannot probe for
    /// the existence of another tenant's data.
    #[error("{entity} {id} is not available to tenant {tenant_id}")]
    CrossTenantReference {
        entity: &'static str,
        id: String,
        tenant_id: String,
    },

    /// Insufficient stock to commit a sale line.
    ///
    /// ## When This Occurs
    /// - A sale line requests more than the product's current stock
    ///
    /// ## User Workflow
    /// ```text
    /// createSale line (qty: 5)
    ///      │
    ///      ▼
    /// Stock ledger reserve: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "COKE", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Whole sale rolled back, nothing committed
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Conversion attempted on a quote that was already converted.
    ///
    /// Conversion is one-shot and refusing, not an idempotent no-op: the
    /// second call must fail instead of silently returning the first order.
    #[error("Quote {quote_id} has already been converted")]
    AlreadyConverted { quote_id: String },

    /// A status change that the document's state machine does not allow.
    ///
    /// ## When This Occurs
    /// - Cancelling an already-cancelled sale
    /// - Moving a completed order back to pending
    /// - Accepting a rejected quote
    #[error("{document} {id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        document: &'static str,
        id: String,
        from: String,
        to: String,
    },

    /// Document id does not exist or does not belong to the tenant.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a CrossTenantReference error.
    pub fn cross_tenant(
        entity: &'static str,
        id: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Self {
        CoreError::CrossTenantReference {
            entity,
            id: id.into(),
            tenant_id: tenant_id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// They are detected before any write begins, so no rollback is needed.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection that must not be empty is empty.
    #[error("{field} must contain at least one entry")]
    Empty { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set for this operation.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed {
        field: String,
        allowed: Vec<String>,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "COKE-330".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for COKE-330: available 3, requested 5"
        );

        let err = CoreError::cross_tenant("Product", "p-1", "t-2");
        assert_eq!(err.to_string(), "Product p-1 is not available to tenant t-2");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Empty {
            field: "lines".to_string(),
        };
        assert_eq!(err.to_string(), "lines must contain at least one entry");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
