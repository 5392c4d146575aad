//! # meridian-db: Database Layer for Meridian Books
//!
//! This crate provides database access for Meridian Books.
//! Each tenant gets its own SQLite database file, opened lazily and cached
//! for the lifetime of the process.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Meridian Books Data Flow                           │
//! │                                                                         │
//! │  REST handler (create_voucher)                                         │
//! │       │  x-tenant-db: acme_traders                                     │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    meridian-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │TenantRegistry │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │ (tenants.rs)  │───►│ (voucher.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ name → pool   │    │ VoucherRepo   │    │ 001_init.sql │  │   │
//! │  │   │ cached forever│    │ EntryRepo ... │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   <data_dir>/acme_traders.db      <data_dir>/other_tenant.db    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`tenants`] - Tenant name → cached database connection registry
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (voucher, entries, masters, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meridian_db::TenantRegistry;
//!
//! let registry = TenantRegistry::new("./data");
//! let db = registry.database("acme_traders").await?;
//!
//! let page = db.vouchers().list(VoucherFilter::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod tenants;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};
pub use tenants::TenantRegistry;

// Repository re-exports for convenience
pub use repository::account::{verify_password, AccountRepository, NewAccount, NewUser, UserRepository};
pub use repository::activity::ActivityLogRepository;
pub use repository::entries::EntryRepository;
pub use repository::masters::{
    CategoryRepository, GatePassRepository, NewCategory, NewGatePass, NewStock, StockRepository,
};
pub use repository::sales::{NewSaleItem, NewSalesVoucher, SalesFilter, SalesVoucherRepository};
pub use repository::voucher::{
    NewVoucher, UpdateVoucher, VoucherFilter, VoucherPage, VoucherRepository, VoucherSort,
};
