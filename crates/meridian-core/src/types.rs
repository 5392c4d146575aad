//! # Domain Types
//!
//! Core domain types used throughout Meridian Books.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Voucher      │   │   EntryBatch    │   │   EntryLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  code (CV-14)   │◄──│  voucher_id(FK) │◄──│  batch_id (FK)  │       │
//! │  │  voucher_type   │   │  account        │   │  debit/credit   │       │
//! │  │  is_void        │   │                 │   │  is_void        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  SalesVoucher   │   │    SaleItem     │   │  ActivityLog    │       │
//! │  │  party_account  │◄──│  qty/rate/disc  │   │  action/entity  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Masters: GatePass, Stock, Category, Account, User                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every voucher has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `code`: business identifier (CV-14) - human-readable, shown on screens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Voucher Type
// =============================================================================

/// The kind of a voucher, which determines its code prefix and numbering
/// sequence. Each type counts up independently per tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum VoucherType {
    /// Cash book voucher.
    Cash,
    /// Sales voucher (carries line items, see [`SalesVoucher`]).
    Sales,
    /// Purchase voucher.
    Purchase,
    /// General journal voucher.
    Journal,
    /// Receipt voucher.
    Receipt,
    /// Payment voucher.
    Payment,
}

impl VoucherType {
    /// The code prefix used when numbering vouchers of this type.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::types::VoucherType;
    ///
    /// assert_eq!(VoucherType::Cash.prefix(), "CV");
    /// assert_eq!(VoucherType::Sales.prefix(), "SV");
    /// ```
    pub const fn prefix(&self) -> &'static str {
        match self {
            VoucherType::Cash => "CV",
            VoucherType::Sales => "SV",
            VoucherType::Purchase => "PV",
            VoucherType::Journal => "JV",
            VoucherType::Receipt => "RV",
            VoucherType::Payment => "PY",
        }
    }

    /// Stable lowercase name, matching the serialized form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            VoucherType::Cash => "cash",
            VoucherType::Sales => "sales",
            VoucherType::Purchase => "purchase",
            VoucherType::Journal => "journal",
            VoucherType::Receipt => "receipt",
            VoucherType::Payment => "payment",
        }
    }

    /// All known voucher types.
    pub const ALL: [VoucherType; 6] = [
        VoucherType::Cash,
        VoucherType::Sales,
        VoucherType::Purchase,
        VoucherType::Journal,
        VoucherType::Receipt,
        VoucherType::Payment,
    ];
}

// =============================================================================
// Voucher
// =============================================================================

/// A dated financial transaction header.
///
/// The accounts a voucher touches are not stored on the header; they are
/// derived from its [`EntryLine`]s, which the ledger is the source of truth
/// for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Voucher {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-readable code: `<TypePrefix>-<sequence>` (e.g. `CV-14`).
    /// Unique per tenant database, monotonically increasing per type.
    pub code: String,

    /// Voucher kind, drives the numbering sequence.
    pub voucher_type: VoucherType,

    /// Sequence number within the type (the numeric part of `code`).
    pub seq: i64,

    /// Transaction date (may differ from `created_at` for backdated entries).
    pub date: DateTime<Utc>,

    /// Free-form description.
    pub narration: Option<String>,

    /// Voided vouchers stay on file but drop out of totals.
    pub is_void: bool,

    /// Whether the voucher has been posted to the ledger.
    pub is_posted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Transaction Line (input)
// =============================================================================

/// One line of a voucher creation request: an account plus a debit or a
/// credit amount. Lines are grouped by account into [`EntryBatch`]es at
/// posting time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Ledger account name.
    pub account: String,

    /// Debit amount in cents. Zero when the line is a credit.
    #[serde(default)]
    pub debit_cents: i64,

    /// Credit amount in cents. Zero when the line is a debit.
    #[serde(default)]
    pub credit_cents: i64,

    /// Optional per-line description.
    #[serde(default)]
    pub narration: Option<String>,
}

impl TransactionLine {
    /// Returns the debit amount as Money.
    #[inline]
    pub fn debit(&self) -> Money {
        Money::from_cents(self.debit_cents)
    }

    /// Returns the credit amount as Money.
    #[inline]
    pub fn credit(&self) -> Money {
        Money::from_cents(self.credit_cents)
    }
}

// =============================================================================
// Entry Batch & Entry Line
// =============================================================================

/// Per-account ledger container. One batch is created per account per
/// voucher creation - not one global ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct EntryBatch {
    pub id: String,
    /// Ledger account this batch belongs to.
    pub account: String,
    /// Voucher that produced this batch.
    pub voucher_id: String,
    pub created_at: DateTime<Utc>,
}

/// One ledger line inside an [`EntryBatch`].
///
/// `is_void`/`is_posted` mirror the owning voucher header; void/unvoid
/// updates both sides in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct EntryLine {
    pub id: String,
    pub batch_id: String,
    pub account: String,
    pub voucher_id: String,
    /// Denormalized voucher code, shown in ledger screens.
    pub voucher_code: String,
    pub debit_cents: i64,
    pub credit_cents: i64,
    pub narration: Option<String>,
    /// Voucher date at posting time.
    pub date: DateTime<Utc>,
    pub is_void: bool,
    pub is_posted: bool,
}

impl EntryLine {
    /// Returns the debit amount as Money.
    #[inline]
    pub fn debit(&self) -> Money {
        Money::from_cents(self.debit_cents)
    }

    /// Returns the credit amount as Money.
    #[inline]
    pub fn credit(&self) -> Money {
        Money::from_cents(self.credit_cents)
    }
}

// =============================================================================
// Sales Voucher
// =============================================================================

/// A sales voucher: the voucher header joined with its sales extension
/// (party account and grand total). Line items travel separately as
/// [`SaleItem`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesVoucher {
    pub id: String,
    pub code: String,
    pub date: DateTime<Utc>,
    /// The customer/party account debited by this sale.
    pub party_account: String,
    /// The income account credited by this sale.
    pub sales_account: String,
    pub narration: Option<String>,
    /// Grand total in cents (sum of line totals).
    pub total_cents: i64,
    pub is_void: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalesVoucher {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in a sales voucher.
/// The line total is computed at creation time and frozen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub voucher_id: String,
    pub item_name: String,
    pub quantity: i64,
    /// Unit rate in cents.
    pub rate_cents: i64,
    /// Discount in basis points (1000 = 10%).
    pub discount_bps: u32,
    /// `quantity × rate` with the discount applied, in cents.
    pub line_total_cents: i64,
}

impl SaleItem {
    /// Returns the unit rate as Money.
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_cents(self.rate_cents)
    }

    /// Returns the frozen line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Activity Log
// =============================================================================

/// The kind of action an [`ActivityLog`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
    Void,
    Unvoid,
    Login,
    Logout,
}

/// Append-only audit record of an action against an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ActivityLog {
    pub id: String,
    pub action: ActivityAction,
    /// Entity kind: "voucher", "gate_pass", "user", ...
    pub entity_kind: String,
    /// Id or code of the affected entity.
    pub entity_id: String,
    /// Who performed the action, when known.
    pub actor: Option<String>,
    /// Optional human-readable detail.
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Gate Pass
// =============================================================================

/// Direction of a goods movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum GatePassDirection {
    /// Goods entering the premises.
    Inward,
    /// Goods leaving the premises.
    Outward,
}

/// A goods-movement record, unrelated to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct GatePass {
    pub id: String,
    pub pass_number: String,
    pub party: String,
    pub vehicle: Option<String>,
    pub item: String,
    pub quantity: i64,
    pub direction: GatePassDirection,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Masters
// =============================================================================

/// An inventory item master record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Stock {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Unit of measure ("pcs", "kg", ...).
    pub unit: String,
    pub opening_qty: i64,
    pub rate_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Stock {
    /// Returns the rate as Money.
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_cents(self.rate_cents)
    }
}

/// A stock category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The accounting classification of a ledger account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Asset,
    Liability,
    Income,
    Expense,
    /// Customer/supplier party account.
    Party,
}

/// A ledger account master record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Account {
    pub id: String,
    pub name: String,
    pub kind: AccountKind,
    pub opening_balance_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Returns the opening balance as Money.
    #[inline]
    pub fn opening_balance(&self) -> Money {
        Money::from_cents(self.opening_balance_cents)
    }
}

/// An application user.
///
/// The password hash never leaves the server: it is skipped on
/// serialization so a `User` can be returned from the API directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Aggregates
// =============================================================================

/// Debit/credit totals for one account over its non-void entry lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountTotals {
    pub account: String,
    pub debit_cents: i64,
    pub credit_cents: i64,
}

impl AccountTotals {
    /// Net movement: debits minus credits.
    #[inline]
    pub fn net(&self) -> Money {
        Money::from_cents(self.debit_cents - self.credit_cents)
    }
}

/// A per-account balance as of a cutoff date.
///
/// Convention: balances are debit-positive, so
/// `balance = opening + debits - credits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AccountBalance {
    pub account: String,
    pub kind: AccountKind,
    pub opening_balance_cents: i64,
    pub debit_cents: i64,
    pub credit_cents: i64,
}

impl AccountBalance {
    /// The closing balance in cents (debit-positive convention).
    #[inline]
    pub fn balance_cents(&self) -> i64 {
        self.opening_balance_cents + self.debit_cents - self.credit_cents
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voucher_type_prefixes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for vt in VoucherType::ALL {
            assert!(seen.insert(vt.prefix()), "duplicate prefix {}", vt.prefix());
        }
    }

    #[test]
    fn test_voucher_type_serde_form() {
        let json = serde_json::to_string(&VoucherType::Purchase).unwrap();
        assert_eq!(json, "\"purchase\"");
        let back: VoucherType = serde_json::from_str("\"journal\"").unwrap();
        assert_eq!(back, VoucherType::Journal);
    }

    #[test]
    fn test_account_balance_convention() {
        let balance = AccountBalance {
            account: "Cash".to_string(),
            kind: AccountKind::Asset,
            opening_balance_cents: 10_000,
            debit_cents: 5_000,
            credit_cents: 2_000,
        };
        assert_eq!(balance.balance_cents(), 13_000);
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let user = User {
            id: "u1".to_string(),
            username: "clerk".to_string(),
            display_name: "Clerk".to_string(),
            password_hash: "secret-hash".to_string(),
            role: "operator".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }

    #[test]
    fn test_transaction_line_money_accessors() {
        let line = TransactionLine {
            account: "Cash".to_string(),
            debit_cents: 1500,
            credit_cents: 0,
            narration: None,
        };
        assert_eq!(line.debit(), Money::from_cents(1500));
        assert!(line.credit().is_zero());
    }
}
