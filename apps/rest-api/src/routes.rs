//! # Router Assembly
//!
//! Maps URL paths/methods to handlers. Separated from `main` so integration
//! tests can drive the router without binding a socket.
//!
//! ## Route Table
//! ```text
//! GET    /health                         liveness (no tenant header needed)
//! POST   /auth/login                     verify password, issue JWT
//! POST   /auth/logout                    audit record only
//! POST   /vouchers                       create voucher + ledger + audit
//! GET    /vouchers                       filter/paginate, optional entries merge
//! GET    /vouchers/balances              per-account opening balances
//! GET    /vouchers/totals/{account}      debit/credit totals for one account
//! GET    /vouchers/{id}                  header + entry lines
//! PUT    /vouchers/{id}                  edit header
//! DELETE /vouchers/{id}                  remove header + ledger
//! POST   /vouchers/{id}/void             void (mirrors into lines)
//! POST   /vouchers/{id}/unvoid           restore
//! POST   /sales-vouchers                 create with line items
//! GET    /sales-vouchers                 list with items merge
//! POST   /gate-passes   GET /gate-passes
//! POST   /categories    GET /categories
//! POST   /stocks        GET /stocks
//! POST   /accounts      GET /accounts
//! POST   /users         GET /users
//! GET    /activities                     audit trail, newest first
//! ```

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{account, activity, auth, masters, sales, voucher};
use crate::AppState;

/// Health check endpoint.
async fn health() -> &'static str {
    "OK"
}

/// Build the axum router (separated for testing).
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Vouchers
        .route("/vouchers", post(voucher::create).get(voucher::list))
        .route("/vouchers/balances", get(voucher::balances))
        .route("/vouchers/totals/{account}", get(voucher::totals))
        .route(
            "/vouchers/{id}",
            get(voucher::get).put(voucher::update).delete(voucher::delete),
        )
        .route("/vouchers/{id}/void", post(voucher::void))
        .route("/vouchers/{id}/unvoid", post(voucher::unvoid))
        // Sales vouchers
        .route("/sales-vouchers", post(sales::create).get(sales::list))
        // Masters
        .route(
            "/gate-passes",
            post(masters::create_gate_pass).get(masters::list_gate_passes),
        )
        .route(
            "/categories",
            post(masters::create_category).get(masters::list_categories),
        )
        .route(
            "/stocks",
            post(masters::create_stock).get(masters::list_stocks),
        )
        .route(
            "/accounts",
            post(account::create_account).get(account::list_accounts),
        )
        .route("/users", post(account::create_user).get(account::list_users))
        // Audit trail
        .route("/activities", get(activity::list))
        .with_state(state)
}
