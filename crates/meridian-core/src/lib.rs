//! # meridian-core: Pure Business Logic for Meridian Books
//!
//! This crate is the **heart** of Meridian Books. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Meridian Books Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    REST Clients (any frontend)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/rest-api (axum)                         │   │
//! │  │    create_voucher, list_vouchers, gate passes, masters, auth   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ meridian-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   codes   │  │ validation│  │   │
//! │  │   │  Voucher  │  │   Money   │  │  CV-14    │  │   rules   │  │   │
//! │  │   │  Entries  │  │ Discounts │  │  SV-3     │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  meridian-db (Database Layer)                   │   │
//! │  │         Per-tenant SQLite, repositories, migrations            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Voucher, EntryLine, GatePass, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`codes`] - Voucher code formatting and parsing
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codes;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use codes::{format_voucher_code, parse_voucher_code};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of transaction lines in a single voucher.
///
/// ## Business Reason
/// Prevents runaway requests and keeps a single posting batch reviewable.
pub const MAX_TRANSACTION_LINES: usize = 100;

/// Maximum number of line items in a single sales voucher.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum length of a narration / description field.
pub const MAX_NARRATION_LEN: usize = 500;

/// Default page size for list endpoints when the client sends none.
pub const DEFAULT_PAGE_LIMIT: i64 = 25;

/// Hard ceiling on page size. Larger requests are clamped, not rejected.
pub const MAX_PAGE_LIMIT: i64 = 200;

/// Number of pages needed to show `total` records at `limit` per page.
///
/// ## Example
/// ```rust
/// use meridian_core::page_count;
///
/// assert_eq!(page_count(0, 25), 0);
/// assert_eq!(page_count(25, 25), 1);
/// assert_eq!(page_count(26, 25), 2);
/// ```
pub fn page_count(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
