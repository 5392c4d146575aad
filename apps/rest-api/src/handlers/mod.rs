//! # Request Handlers
//!
//! One module per screen family, mirroring the route table:
//!
//! - [`voucher`] - generic voucher lifecycle and aggregates
//! - [`sales`] - sales vouchers with line items
//! - [`masters`] - gate passes, stock, categories
//! - [`account`] - account and user masters
//! - [`auth`] - login/logout (tokens issued, never enforced)
//! - [`activity`] - audit trail listing

pub mod account;
pub mod activity;
pub mod auth;
pub mod masters;
pub mod sales;
pub mod voucher;
