//! # Wire Types
//!
//! Request payloads, query parameters, and response envelopes.
//!
//! ## Envelope Convention
//! Success responses follow `{ "message": ..., <entity>: ..., "entries"?: ... }`;
//! failures follow `{ "message": ..., "error": <code> }` (see [`crate::error`]).
//!
//! Dates in requests are calendar dates (`YYYY-MM-DD`); the handlers widen
//! them to UTC instants, with range upper bounds exclusive.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use meridian_core::{
    Account, AccountBalance, AccountKind, AccountTotals, ActivityLog, Category, EntryLine,
    GatePass, GatePassDirection, SaleItem, SalesVoucher, Stock, TransactionLine, User, Voucher,
    VoucherType,
};
use meridian_db::VoucherSort;

// =============================================================================
// Date Helpers
// =============================================================================

/// Midnight UTC at the start of the given calendar date.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Midnight UTC at the start of the following day (exclusive upper bound).
pub fn start_of_next_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1)
}

fn default_true() -> bool {
    true
}

fn default_sales_account() -> String {
    "Sales".to_string()
}

// =============================================================================
// Voucher Requests
// =============================================================================

/// Body of `POST /vouchers`.
#[derive(Debug, Deserialize)]
pub struct CreateVoucherRequest {
    #[serde(alias = "type")]
    pub voucher_type: VoucherType,
    pub date: NaiveDate,
    #[serde(default)]
    pub narration: Option<String>,
    #[serde(default = "default_true")]
    pub is_posted: bool,
    pub transactions: Vec<TransactionLine>,
}

/// Body of `PUT /vouchers/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateVoucherRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub narration: Option<String>,
    #[serde(default)]
    pub is_posted: Option<bool>,
}

/// Query string of `GET /vouchers`.
#[derive(Debug, Default, Deserialize)]
pub struct ListVouchersQuery {
    #[serde(alias = "type")]
    pub voucher_type: Option<VoucherType>,
    /// Filter on the void flag.
    pub void: Option<bool>,
    /// Single-day filter; shorthand for `from`/`to` spanning one day.
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Free-text search over code and narration.
    pub search: Option<String>,
    /// Only vouchers touching this account.
    pub account: Option<String>,
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
    pub sort: Option<VoucherSort>,
    /// Attach entry lines to each voucher (second query + in-memory merge).
    #[serde(default)]
    pub include_entries: bool,
}

/// Query string of `GET /vouchers/totals/{account}`.
#[derive(Debug, Default, Deserialize)]
pub struct TotalsQuery {
    /// Exclusive cutoff date.
    pub until: Option<NaiveDate>,
}

/// Query string of `GET /vouchers/balances`.
#[derive(Debug, Default, Deserialize)]
pub struct BalancesQuery {
    /// Exclusive cutoff date.
    pub as_of: Option<NaiveDate>,
}

// =============================================================================
// Sales Voucher Requests
// =============================================================================

/// One requested sale line item.
#[derive(Debug, Deserialize)]
pub struct SaleItemRequest {
    pub item_name: String,
    pub quantity: i64,
    pub rate_cents: i64,
    #[serde(default)]
    pub discount_bps: u32,
}

/// Body of `POST /sales-vouchers`.
#[derive(Debug, Deserialize)]
pub struct CreateSalesVoucherRequest {
    pub date: NaiveDate,
    pub party_account: String,
    #[serde(default = "default_sales_account")]
    pub sales_account: String,
    #[serde(default)]
    pub narration: Option<String>,
    pub items: Vec<SaleItemRequest>,
}

/// Query string of `GET /sales-vouchers`.
#[derive(Debug, Default, Deserialize)]
pub struct ListSalesQuery {
    pub void: Option<bool>,
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
    pub party: Option<String>,
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
    /// Attach line items to each voucher.
    #[serde(default = "default_true")]
    pub include_items: bool,
}

// =============================================================================
// Master Requests
// =============================================================================

/// Body of `POST /gate-passes`.
#[derive(Debug, Deserialize)]
pub struct CreateGatePassRequest {
    pub pass_number: String,
    pub party: String,
    #[serde(default)]
    pub vehicle: Option<String>,
    pub item: String,
    pub quantity: i64,
    pub direction: GatePassDirection,
    pub date: NaiveDate,
}

/// Query string of `GET /gate-passes`.
#[derive(Debug, Default, Deserialize)]
pub struct ListGatePassQuery {
    pub direction: Option<GatePassDirection>,
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

/// Body of `POST /stocks`.
#[derive(Debug, Deserialize)]
pub struct CreateStockRequest {
    pub name: String,
    pub category: String,
    pub unit: String,
    #[serde(default)]
    pub opening_qty: i64,
    #[serde(default)]
    pub rate_cents: i64,
}

/// Query string of `GET /stocks`.
#[derive(Debug, Default, Deserialize)]
pub struct ListStockQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

/// Body of `POST /categories`.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /accounts`.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub kind: AccountKind,
    #[serde(default)]
    pub opening_balance_cents: i64,
}

/// Body of `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub display_name: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "operator".to_string()
}

/// Generic skip/limit query for simple listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

// =============================================================================
// Auth Requests
// =============================================================================

/// Body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/logout`.
#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    pub username: Option<String>,
}

// =============================================================================
// Voucher Responses
// =============================================================================

/// `{ message, voucher, entries? }`
#[derive(Debug, Serialize)]
pub struct VoucherResponse {
    pub message: String,
    pub voucher: Voucher,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<EntryLine>>,
}

/// A voucher with optionally merged entry lines, as it appears in lists.
#[derive(Debug, Serialize)]
pub struct VoucherListItem {
    #[serde(flatten)]
    pub voucher: Voucher,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<EntryLine>>,
}

/// `{ message, vouchers, total_count, page_count }`
#[derive(Debug, Serialize)]
pub struct VoucherListResponse {
    pub message: String,
    pub vouchers: Vec<VoucherListItem>,
    pub total_count: i64,
    pub page_count: i64,
}

/// `{ message, totals }`
#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub message: String,
    pub totals: AccountTotals,
}

/// One account balance row with the closing balance materialized.
#[derive(Debug, Serialize)]
pub struct BalanceDto {
    pub account: String,
    pub kind: AccountKind,
    pub opening_balance_cents: i64,
    pub debit_cents: i64,
    pub credit_cents: i64,
    pub balance_cents: i64,
}

impl From<AccountBalance> for BalanceDto {
    fn from(balance: AccountBalance) -> Self {
        let balance_cents = balance.balance_cents();
        BalanceDto {
            account: balance.account,
            kind: balance.kind,
            opening_balance_cents: balance.opening_balance_cents,
            debit_cents: balance.debit_cents,
            credit_cents: balance.credit_cents,
            balance_cents,
        }
    }
}

/// `{ message, balances }`
#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    pub message: String,
    pub balances: Vec<BalanceDto>,
}

// =============================================================================
// Sales Voucher Responses
// =============================================================================

/// `{ message, voucher, items }`
#[derive(Debug, Serialize)]
pub struct SalesVoucherResponse {
    pub message: String,
    pub voucher: SalesVoucher,
    pub items: Vec<SaleItem>,
}

/// A sales voucher with merged items, as it appears in lists.
#[derive(Debug, Serialize)]
pub struct SalesListItem {
    #[serde(flatten)]
    pub voucher: SalesVoucher,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SaleItem>>,
}

/// `{ message, vouchers, total_count, page_count }`
#[derive(Debug, Serialize)]
pub struct SalesListResponse {
    pub message: String,
    pub vouchers: Vec<SalesListItem>,
    pub total_count: i64,
    pub page_count: i64,
}

// =============================================================================
// Master & Misc Responses
// =============================================================================

/// `{ message, gate_pass }`
#[derive(Debug, Serialize)]
pub struct GatePassResponse {
    pub message: String,
    pub gate_pass: GatePass,
}

/// `{ message, gate_passes, total_count, page_count }`
#[derive(Debug, Serialize)]
pub struct GatePassListResponse {
    pub message: String,
    pub gate_passes: Vec<GatePass>,
    pub total_count: i64,
    pub page_count: i64,
}

/// `{ message, stock }`
#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub message: String,
    pub stock: Stock,
}

/// `{ message, stocks, total_count, page_count }`
#[derive(Debug, Serialize)]
pub struct StockListResponse {
    pub message: String,
    pub stocks: Vec<Stock>,
    pub total_count: i64,
    pub page_count: i64,
}

/// `{ message, category }`
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub message: String,
    pub category: Category,
}

/// `{ message, categories, total_count, page_count }`
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub message: String,
    pub categories: Vec<Category>,
    pub total_count: i64,
    pub page_count: i64,
}

/// `{ message, account }`
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub message: String,
    pub account: Account,
}

/// `{ message, accounts, total_count, page_count }`
#[derive(Debug, Serialize)]
pub struct AccountListResponse {
    pub message: String,
    pub accounts: Vec<Account>,
    pub total_count: i64,
    pub page_count: i64,
}

/// `{ message, user }`
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

/// `{ message, users, total_count, page_count }`
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub message: String,
    pub users: Vec<User>,
    pub total_count: i64,
    pub page_count: i64,
}

/// `{ message, activities, total_count, page_count }`
#[derive(Debug, Serialize)]
pub struct ActivityListResponse {
    pub message: String,
    pub activities: Vec<ActivityLog>,
    pub total_count: i64,
    pub page_count: i64,
}

/// `{ message, token, user }`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

/// Bare `{ message }` envelope.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
