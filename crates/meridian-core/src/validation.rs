//! # Validation Module
//!
//! Input validation utilities for Meridian Books.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request deserialization (serde)                              │
//! │  ├── Type validation (numbers are numbers, dates parse)                │
//! │  └── Rejects malformed JSON outright                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── Required fields, lengths, ranges                                  │
//! │  └── Transaction line / sale item shape                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::TransactionLine;
use crate::{MAX_NARRATION_LEN, MAX_SALE_ITEMS, MAX_TRANSACTION_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required name field (account names, item names, party names).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 120 characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 120 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 120,
        });
    }

    Ok(())
}

/// Validates an optional narration / description field.
///
/// ## Rules
/// - May be absent
/// - Must be at most [`MAX_NARRATION_LEN`] characters
pub fn validate_narration(narration: Option<&str>) -> ValidationResult<()> {
    if let Some(text) = narration {
        if text.len() > MAX_NARRATION_LEN {
            return Err(ValidationError::TooLong {
                field: "narration".to_string(),
                max: MAX_NARRATION_LEN,
            });
        }
    }

    Ok(())
}

/// Validates a tenant database name from the request header.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 64 characters
/// - Only letters, digits, hyphens and underscores
///
/// The character restriction means a header value can never escape the
/// server's data directory.
///
/// ## Example
/// ```rust
/// use meridian_core::validation::validate_tenant_name;
///
/// assert!(validate_tenant_name("acme_traders").is_ok());
/// assert!(validate_tenant_name("../etc/passwd").is_err());
/// assert!(validate_tenant_name("").is_err());
/// ```
pub fn validate_tenant_name(tenant: &str) -> ValidationResult<()> {
    if tenant.is_empty() {
        return Err(ValidationError::Required {
            field: "tenant".to_string(),
        });
    }

    if tenant.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "tenant".to_string(),
            max: 64,
        });
    }

    if !tenant
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "tenant".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a username.
///
/// ## Rules
/// - Must not be empty
/// - 3 to 40 characters
/// - Only letters, digits, dots, hyphens and underscores
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() < 3 || username.len() > 40 {
        return Err(ValidationError::OutOfRange {
            field: "username length".to_string(),
            min: 3,
            max: 40,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, dots, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a rate or amount in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, nil balances)
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

/// Validates a discount in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "discount_bps".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Transaction Line Validators
// =============================================================================

/// Validates the transaction list of a voucher creation request.
///
/// ## Rules
/// - Must not be empty, at most [`MAX_TRANSACTION_LINES`] lines
/// - Every line names an account
/// - Every line carries exactly one of a positive debit or a positive credit
///
/// ## User Workflow
/// ```text
/// POST /vouchers { transactions: [...] }
///      │
///      ▼
/// validate_transaction_lines(&lines) ← THIS FUNCTION
///      │
///      ├── empty? → Error: "transactions is required"
///      ├── debit AND credit on one line? → Error: ambiguous amount
///      ├── neither? → Error: ambiguous amount
///      │
///      └── OK → group by account, post batches
/// ```
pub fn validate_transaction_lines(lines: &[TransactionLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "transactions".to_string(),
        });
    }

    if lines.len() > MAX_TRANSACTION_LINES {
        return Err(ValidationError::OutOfRange {
            field: "transactions".to_string(),
            min: 1,
            max: MAX_TRANSACTION_LINES as i64,
        });
    }

    for line in lines {
        validate_name("account", &line.account)?;
        validate_narration(line.narration.as_deref())?;

        let has_debit = line.debit_cents > 0;
        let has_credit = line.credit_cents > 0;

        if line.debit_cents < 0 || line.credit_cents < 0 || has_debit == has_credit {
            return Err(ValidationError::AmbiguousAmount {
                account: line.account.clone(),
            });
        }
    }

    Ok(())
}

/// Validates the number of line items in a sales voucher request.
pub fn validate_sale_item_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if count > MAX_SALE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_ITEMS as i64,
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

    fn debit(account: &str, cents: i64) -> TransactionLine {
        TransactionLine {
            account: account.to_string(),
            debit_cents: cents,
            credit_cents: 0,
            narration: None,
        }
    }

    fn credit(account: &str, cents: i64) -> TransactionLine {
        TransactionLine {
            account: account.to_string(),
            debit_cents: 0,
            credit_cents: cents,
            narration: None,
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("account", "Cash").is_ok());
        assert!(validate_name("account", "  ").is_err());
        assert!(validate_name("account", &"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_tenant_name() {
        assert!(validate_tenant_name("acme_traders").is_ok());
        assert!(validate_tenant_name("shop-2").is_ok());

        assert!(validate_tenant_name("").is_err());
        assert!(validate_tenant_name("../escape").is_err());
        assert!(validate_tenant_name("with space").is_err());
        assert!(validate_tenant_name("dot.dot").is_err());
        assert!(validate_tenant_name(&"x".repeat(80)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("clerk.01").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_validate_quantity_and_cents() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());

        assert!(validate_cents("rate", 0).is_ok());
        assert!(validate_cents("rate", 1099).is_ok());
        assert!(validate_cents("rate", -1).is_err());
    }

    #[test]
    fn test_validate_discount_bps() {
        assert!(validate_discount_bps(0).is_ok());
        assert!(validate_discount_bps(10000).is_ok());
        assert!(validate_discount_bps(10001).is_err());
    }

    #[test]
    fn test_transaction_lines_happy_path() {
        let lines = vec![debit("Cash", 1000), credit("Sales", 1000)];
        assert!(validate_transaction_lines(&lines).is_ok());
    }

    #[test]
    fn test_transaction_lines_rejected() {
        // Empty list
        assert!(validate_transaction_lines(&[]).is_err());

        // Both debit and credit on the same line
        let both = TransactionLine {
            account: "Cash".to_string(),
            debit_cents: 500,
            credit_cents: 500,
            narration: None,
        };
        assert!(validate_transaction_lines(&[both]).is_err());

        // Neither side set
        let neither = TransactionLine {
            account: "Cash".to_string(),
            debit_cents: 0,
            credit_cents: 0,
            narration: None,
        };
        assert!(validate_transaction_lines(&[neither]).is_err());

        // Negative amount
        let negative = TransactionLine {
            account: "Cash".to_string(),
            debit_cents: -100,
            credit_cents: 0,
            narration: None,
        };
        assert!(validate_transaction_lines(&[negative]).is_err());

        // Missing account name
        assert!(validate_transaction_lines(&[debit("", 100)]).is_err());
    }

    #[test]
    fn test_sale_item_count() {
        assert!(validate_sale_item_count(1).is_ok());
        assert!(validate_sale_item_count(0).is_err());
        assert!(validate_sale_item_count(MAX_SALE_ITEMS + 1).is_err());
    }
}
