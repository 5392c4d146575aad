//! # Repository Module
//!
//! Database repository implementations for Meridian Books.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  REST handler                                                          │
//! │       │                                                                 │
//! │       │  db.vouchers().list(filter)                                    │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  VoucherRepository                                                     │
//! │  ├── create(&self, new)                                                │
//! │  ├── get(&self, id)                                                    │
//! │  ├── list(&self, filter)                                               │
//! │  └── set_void(&self, id, void, actor)                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  Tenant's SQLite Database                                              │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • SQL is isolated in one place                                        │
//! │  • Multi-statement flows are wrapped in one transaction                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`voucher::VoucherRepository`] - Voucher lifecycle and aggregates
//! - [`sales::SalesVoucherRepository`] - Sales vouchers with line items
//! - [`entries::EntryRepository`] - Ledger batches and lines
//! - [`activity::ActivityLogRepository`] - Append-only audit trail
//! - [`masters::GatePassRepository`] / [`masters::StockRepository`] /
//!   [`masters::CategoryRepository`] - Master records
//! - [`account::AccountRepository`] / [`account::UserRepository`] - Accounts and users

pub mod account;
pub mod activity;
pub mod entries;
pub mod masters;
pub mod sales;
pub mod voucher;
