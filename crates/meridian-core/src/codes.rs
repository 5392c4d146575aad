//! # Voucher Codes
//!
//! Formatting and parsing of human-readable voucher codes.
//!
//! ## Code Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Voucher Code Anatomy                              │
//! │                                                                         │
//! │       CV-14                                                             │
//! │       ──┬──                                                             │
//! │   ┌─────┘  └─────┐                                                      │
//! │   │              │                                                      │
//! │  prefix       sequence                                                  │
//! │  (per type)   (per type, per tenant, starts at 1)                       │
//! │                                                                         │
//! │  Sequences come from the voucher_counters table, bumped inside the     │
//! │  same transaction that inserts the voucher header. A UNIQUE index on   │
//! │  the code column backstops the guarantee.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::types::VoucherType;

/// Formats a voucher code from a type and sequence number.
///
/// ## Example
/// ```rust
/// use meridian_core::codes::format_voucher_code;
/// use meridian_core::types::VoucherType;
///
/// assert_eq!(format_voucher_code(VoucherType::Cash, 14), "CV-14");
/// assert_eq!(format_voucher_code(VoucherType::Sales, 3), "SV-3");
/// ```
pub fn format_voucher_code(voucher_type: VoucherType, seq: i64) -> String {
    format!("{}-{}", voucher_type.prefix(), seq)
}

/// Parses a voucher code back into its type and sequence.
///
/// Returns `None` when the prefix is unknown or the sequence part is not a
/// positive integer.
///
/// ## Example
/// ```rust
/// use meridian_core::codes::parse_voucher_code;
/// use meridian_core::types::VoucherType;
///
/// assert_eq!(parse_voucher_code("CV-14"), Some((VoucherType::Cash, 14)));
/// assert_eq!(parse_voucher_code("XX-14"), None);
/// assert_eq!(parse_voucher_code("CV-abc"), None);
/// ```
pub fn parse_voucher_code(code: &str) -> Option<(VoucherType, i64)> {
    let (prefix, seq) = code.split_once('-')?;

    let voucher_type = VoucherType::ALL
        .into_iter()
        .find(|vt| vt.prefix() == prefix)?;

    let seq: i64 = seq.parse().ok()?;
    if seq < 1 {
        return None;
    }

    Some((voucher_type, seq))
}

// =============================================================================
// Unit Tests
// =============================================================================
