//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  meridian-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  REST API errors (in app)                                              │
//! │  └── ApiError         - What clients see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, account, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Voucher cannot be found by id or code.
    #[error("Voucher not found: {0}")]
    VoucherNotFound(String),

    /// Account master record cannot be found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Voucher is already void and cannot be voided again.
    ///
    /// ## When This Occurs
    /// - Double-click on the void button
    /// - Two operators voiding the same voucher
    #[error("Voucher {0} is already void")]
    AlreadyVoid(String),

    /// Voucher is not void, so unvoid is meaningless.
    #[error("Voucher {0} is not void")]
    NotVoid(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid tenant name, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A transaction line must carry a debit or a credit, never both.
    #[error("transaction line for '{account}' must have exactly one of debit or credit")]
    AmbiguousAmount { account: String },

    /// Duplicate value (e.g., duplicate stock name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
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
        let err = CoreError::AlreadyVoid("CV-14".to_string());
        assert_eq!(err.to_string(), "Voucher CV-14 is already void");

        let err = CoreError::VoucherNotFound("SV-3".to_string());
        assert_eq!(err.to_string(), "Voucher not found: SV-3");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "account".to_string(),
        };
        assert_eq!(err.to_string(), "account is required");

        let err = ValidationError::AmbiguousAmount {
            account: "Cash".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "transaction line for 'Cash' must have exactly one of debit or credit"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "date".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
