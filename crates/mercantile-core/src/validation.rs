//! # Validation Module
//!
//! Input validation for the commerce engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (HTTP/auth layer, out of scope)                       │
//! │  ├── Tenant/session validation, plan quotas                            │
//! │  └── Payload deserialization                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before any write begins)                        │
//! │  ├── Non-empty line lists, positive quantities                         │
//! │  └── Non-negative prices/totals, well-formed references                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints (stock_quantity >= 0)                │
//! │  ├── UNIQUE constraints (document numbers)                             │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs before the engine opens a transaction, so a
//! validation failure never needs a rollback.

use crate::error::ValidationError;
use crate::input::{
    ClientRef, CreateOrderInput, CreateQuoteInput, CreateSaleInput, LineInput, StatsPeriod,
};
use crate::{MAX_DOCUMENT_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price or amount in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, zero-tax documents)
pub fn validate_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a UUID string format.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Structured Validators
// =============================================================================

/// Validates a single line item.
pub fn validate_line(index: usize, line: &LineInput) -> ValidationResult<()> {
    let field = |name: &str| format!("lines[{index}].{name}");

    validate_uuid(&field("product_id"), &line.product_id)?;
    validate_quantity(line.quantity).map_err(|_| ValidationError::MustBePositive {
        field: field("quantity"),
    })?;
    validate_cents(&field("unit_price_cents"), line.unit_price_cents)?;
    validate_cents(&field("subtotal_cents"), line.subtotal_cents)?;
    validate_cents(&field("discount_cents"), line.discount_cents)?;

    Ok(())
}

/// Validates a document's line list: non-empty, bounded, each line sound.
pub fn validate_lines(lines: &[LineInput]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Empty {
            field: "lines".to_string(),
        });
    }

    if lines.len() > MAX_DOCUMENT_LINES {
        return Err(ValidationError::OutOfRange {
            field: "lines".to_string(),
            min: 1,
            max: MAX_DOCUMENT_LINES as i64,
        });
    }

    for (index, line) in lines.iter().enumerate() {
        validate_line(index, line)?;
    }

    Ok(())
}

/// Validates a client reference, if present.
///
/// Tenant membership of a registered id is a storage concern (the engine
/// resolves it inside the transaction); here only shape is checked.
pub fn validate_client_ref(client: Option<&ClientRef>) -> ValidationResult<()> {
    match client {
        None => Ok(()),
        Some(ClientRef::Registered { client_id }) => validate_uuid("client_id", client_id),
        Some(ClientRef::Direct { name, .. }) => {
            if name.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "client.name".to_string(),
                });
            }
            if name.len() > 200 {
                return Err(ValidationError::TooLong {
                    field: "client.name".to_string(),
                    max: 200,
                });
            }
            Ok(())
        }
    }
}

fn validate_totals(totals: &crate::input::DocumentTotals) -> ValidationResult<()> {
    validate_cents("subtotal_cents", totals.subtotal_cents)?;
    validate_cents("discount_cents", totals.discount_cents)?;
    validate_cents("tax_cents", totals.tax_cents)?;
    validate_cents("total_cents", totals.total_cents)?;
    Ok(())
}

// =============================================================================
// Per-Document Validators
// =============================================================================

/// Validates a sale creation input before any write begins.
pub fn validate_create_sale(input: &CreateSaleInput) -> ValidationResult<()> {
    validate_lines(&input.lines)?;
    validate_client_ref(input.client.as_ref())?;
    validate_totals(&input.totals)?;
    Ok(())
}

/// Validates an order creation input before any write begins.
pub fn validate_create_order(input: &CreateOrderInput) -> ValidationResult<()> {
    validate_lines(&input.lines)?;
    validate_client_ref(input.client.as_ref())?;
    validate_totals(&input.totals)?;
    Ok(())
}

/// Validates a quote creation input before any write begins.
pub fn validate_create_quote(input: &CreateQuoteInput) -> ValidationResult<()> {
    validate_lines(&input.lines)?;
    validate_client_ref(input.client.as_ref())?;
    validate_totals(&input.totals)?;
    Ok(())
}

/// Validates a stats window: the start must precede the end.
pub fn validate_stats_period(period: &StatsPeriod) -> ValidationResult<()> {
    if period.from >= period.to {
        return Err(ValidationError::InvalidFormat {
            field: "period".to_string(),
            reason: "`from` must be before `to`".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DocumentTotals;
    use chrono::{Duration, Utc};

    fn line(product_id: &str, qty: i64) -> LineInput {
        LineInput {
            product_id: product_id.to_string(),
            quantity: qty,
            unit_price_cents: 500,
            subtotal_cents: 500 * qty.max(0),
            discount_cents: 0,
        }
    }

    const PRODUCT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_cents() {
        assert!(validate_cents("price", 0).is_ok());
        assert!(validate_cents("price", 1099).is_ok());
        assert!(validate_cents("price", -1).is_err());
    }

    #[test]
    fn test_validate_lines_rejects_empty() {
        let err = validate_lines(&[]).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn test_validate_lines_rejects_bad_line() {
        assert!(validate_lines(&[line(PRODUCT_ID, 0)]).is_err());
        assert!(validate_lines(&[line("not-a-uuid", 1)]).is_err());
        assert!(validate_lines(&[line(PRODUCT_ID, 1)]).is_ok());
    }

    #[test]
    fn test_validate_client_ref() {
        assert!(validate_client_ref(None).is_ok());
        assert!(validate_client_ref(Some(&ClientRef::Registered {
            client_id: PRODUCT_ID.to_string(),
        }))
        .is_ok());
        assert!(validate_client_ref(Some(&ClientRef::Registered {
            client_id: "nope".to_string(),
        }))
        .is_err());
        assert!(validate_client_ref(Some(&ClientRef::Direct {
            name: "Walk-in".to_string(),
            email: None,
            phone: None,
        }))
        .is_ok());
        assert!(validate_client_ref(Some(&ClientRef::Direct {
            name: "   ".to_string(),
            email: None,
            phone: None,
        }))
        .is_err());
    }

    #[test]
    fn test_validate_create_sale() {
        let input = CreateSaleInput {
            client: None,
            lines: vec![line(PRODUCT_ID, 2)],
            totals: DocumentTotals {
                subtotal_cents: 1000,
                discount_cents: 0,
                tax_cents: 80,
                total_cents: 1080,
            },
            payment_method: Some("cash".to_string()),
            notes: None,
        };
        assert!(validate_create_sale(&input).is_ok());

        let mut negative = input.clone();
        negative.totals.total_cents = -1;
        assert!(validate_create_sale(&negative).is_err());
    }

    #[test]
    fn test_validate_stats_period() {
        let now = Utc::now();
        assert!(validate_stats_period(&StatsPeriod {
            from: now - Duration::days(30),
            to: now,
        })
        .is_ok());
        assert!(validate_stats_period(&StatsPeriod { from: now, to: now }).is_err());
    }
}
