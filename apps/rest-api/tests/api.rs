//! End-to-end router tests: real handlers, real per-tenant SQLite files in a
//! temp directory, driven through `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use meridian_api::config::ServerConfig;
use meridian_api::routes::router;
use meridian_api::AppState;

fn test_app(dir: &TempDir) -> Router {
    let state = AppState::new(ServerConfig {
        port: 0,
        bind_addr: "127.0.0.1".to_string(),
        data_dir: dir.path().to_path_buf(),
        jwt_secret: "test-secret".to_string(),
        jwt_access_lifetime_secs: 3600,
    });
    router(state)
}

/// Sends one request and returns (status, parsed JSON body).
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    tenant: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(tenant) = tenant {
        builder = builder.header("x-tenant-db", tenant);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

fn cash_voucher_body(date: &str, cents: i64) -> Value {
    json!({
        "type": "cash",
        "date": date,
        "narration": "cash received",
        "transactions": [
            { "account": "Cash", "debit_cents": cents },
            { "account": "Sales", "credit_cents": cents }
        ]
    })
}

#[tokio::test]
async fn test_health_needs_no_tenant() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_or_bad_tenant_header() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, "GET", "/vouchers", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("x-tenant-db"));

    let (status, _) = send(&app, "GET", "/vouchers", Some("../escape"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_voucher_lifecycle() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let tenant = Some("acme_traders");

    // Create two vouchers
    let (status, body) = send(
        &app,
        "POST",
        "/vouchers",
        tenant,
        Some(cash_voucher_body("2026-03-01", 1000)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["voucher"]["code"], "CV-1");
    assert_eq!(body["entries"].as_array().unwrap().len(), 2);
    let first_id = body["voucher"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/vouchers",
        tenant,
        Some(cash_voucher_body("2026-03-05", 500)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["voucher"]["code"], "CV-2");

    // List with merged entries
    let (status, body) = send(
        &app,
        "GET",
        "/vouchers?include_entries=true&sort=code_asc",
        tenant,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["page_count"], 1);
    let vouchers = body["vouchers"].as_array().unwrap();
    assert_eq!(vouchers[0]["code"], "CV-1");
    assert_eq!(vouchers[0]["entries"].as_array().unwrap().len(), 2);

    // Get one
    let (status, body) = send(&app, "GET", &format!("/vouchers/{first_id}"), tenant, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["voucher"]["code"], "CV-1");

    // Totals before voiding
    let (status, body) = send(&app, "GET", "/vouchers/totals/Cash", tenant, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["debit_cents"], 1500);
    assert_eq!(body["totals"]["credit_cents"], 0);

    // Void the first voucher; totals drop
    let (status, body) = send(
        &app,
        "POST",
        &format!("/vouchers/{first_id}/void"),
        tenant,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["voucher"]["is_void"], true);

    let (_, body) = send(&app, "GET", "/vouchers/totals/Cash", tenant, None).await;
    assert_eq!(body["totals"]["debit_cents"], 500);

    // Double void is a business-rule conflict
    let (status, body) = send(
        &app,
        "POST",
        &format!("/vouchers/{first_id}/void"),
        tenant,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "BUSINESS_RULE");

    // Void filter narrows
    let (_, body) = send(&app, "GET", "/vouchers?void=true", tenant, None).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["vouchers"][0]["code"], "CV-1");

    // Unvoid restores totals
    let (status, _) = send(
        &app,
        "POST",
        &format!("/vouchers/{first_id}/unvoid"),
        tenant,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/vouchers/totals/Cash", tenant, None).await;
    assert_eq!(body["totals"]["debit_cents"], 1500);

    // Update narration and date
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/vouchers/{first_id}"),
        tenant,
        Some(json!({ "date": "2026-03-10", "narration": "revised" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["voucher"]["narration"], "revised");

    // Delete, then 404
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/vouchers/{first_id}"),
        tenant,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/vouchers/{first_id}"), tenant, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_voucher_validation_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let tenant = Some("acme_traders");

    // Empty transaction list
    let (status, body) = send(
        &app,
        "POST",
        "/vouchers",
        tenant,
        Some(json!({ "type": "cash", "date": "2026-03-01", "transactions": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    // Debit and credit on the same line
    let (status, _) = send(
        &app,
        "POST",
        "/vouchers",
        tenant,
        Some(json!({
            "type": "cash",
            "date": "2026-03-01",
            "transactions": [
                { "account": "Cash", "debit_cents": 100, "credit_cents": 100 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_date_filters() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let tenant = Some("acme_traders");

    for (date, cents) in [("2026-03-01", 100), ("2026-03-05", 200), ("2026-03-09", 300)] {
        send(&app, "POST", "/vouchers", tenant, Some(cash_voucher_body(date, cents))).await;
    }

    // Single date
    let (_, body) = send(&app, "GET", "/vouchers?date=2026-03-05", tenant, None).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["vouchers"][0]["code"], "CV-2");

    // Range [from, to] inclusive of `to`'s whole day
    let (_, body) = send(&app, "GET", "/vouchers?from=2026-03-04&to=2026-03-09", tenant, None).await;
    assert_eq!(body["total_count"], 2);

    // Search over code
    let (_, body) = send(&app, "GET", "/vouchers?search=CV-3", tenant, None).await;
    assert_eq!(body["total_count"], 1);

    // Account membership
    let (_, body) = send(&app, "GET", "/vouchers?account=Sales", tenant, None).await;
    assert_eq!(body["total_count"], 3);
    let (_, body) = send(&app, "GET", "/vouchers?account=Rent", tenant, None).await;
    assert_eq!(body["total_count"], 0);
}

#[tokio::test]
async fn test_tenant_isolation() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, _) = send(
        &app,
        "POST",
        "/vouchers",
        Some("alpha"),
        Some(cash_voucher_body("2026-03-01", 1000)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Same process, different tenant header: nothing there,
    // and both vouchers start their own sequence.
    let (_, body) = send(&app, "GET", "/vouchers", Some("beta"), None).await;
    assert_eq!(body["total_count"], 0);

    let (_, body) = send(
        &app,
        "POST",
        "/vouchers",
        Some("beta"),
        Some(cash_voucher_body("2026-03-02", 700)),
    )
    .await;
    assert_eq!(body["voucher"]["code"], "CV-1");

    let (_, body) = send(&app, "GET", "/vouchers", Some("alpha"), None).await;
    assert_eq!(body["total_count"], 1);
}

#[tokio::test]
async fn test_sales_voucher_flow() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let tenant = Some("acme_traders");

    // 3 × 2.99 minus 10% = 8.07; 2 × 5.00 = 10.00; total 18.07
    let (status, body) = send(
        &app,
        "POST",
        "/sales-vouchers",
        tenant,
        Some(json!({
            "date": "2026-04-01",
            "party_account": "Khan & Co",
            "items": [
                { "item_name": "Widget", "quantity": 3, "rate_cents": 299, "discount_bps": 1000 },
                { "item_name": "Gadget", "quantity": 2, "rate_cents": 500 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["voucher"]["code"], "SV-1");
    assert_eq!(body["voucher"]["total_cents"], 1807);
    assert_eq!(body["items"][0]["line_total_cents"], 807);

    // The ledger saw the posting
    let (_, body) = send(&app, "GET", "/vouchers/totals/Khan%20%26%20Co", tenant, None).await;
    assert_eq!(body["totals"]["debit_cents"], 1807);

    // List with items merged
    let (status, body) = send(&app, "GET", "/sales-vouchers", tenant, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["vouchers"][0]["items"].as_array().unwrap().len(), 2);

    // Empty item list rejected
    let (status, _) = send(
        &app,
        "POST",
        "/sales-vouchers",
        tenant,
        Some(json!({ "date": "2026-04-02", "party_account": "X", "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_masters_and_pagination() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let tenant = Some("acme_traders");

    for name in ["Cement", "Steel", "Paint", "Timber", "Glass"] {
        let (status, _) = send(
            &app,
            "POST",
            "/categories",
            tenant,
            Some(json!({ "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Duplicate name is a business-rule conflict
    let (status, body) = send(
        &app,
        "POST",
        "/categories",
        tenant,
        Some(json!({ "name": "Cement" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "BUSINESS_RULE");

    // ceil(5 / 2) = 3 pages
    let (_, body) = send(&app, "GET", "/categories?limit=2", tenant, None).await;
    assert_eq!(body["total_count"], 5);
    assert_eq!(body["page_count"], 3);
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);

    // Stock tied to a category, filterable
    let (status, _) = send(
        &app,
        "POST",
        "/stocks",
        tenant,
        Some(json!({
            "name": "OPC 53 Grade",
            "category": "Cement",
            "unit": "bag",
            "opening_qty": 120,
            "rate_cents": 115000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/stocks?category=Cement", tenant, None).await;
    assert_eq!(body["total_count"], 1);
    let (_, body) = send(&app, "GET", "/stocks?category=Steel", tenant, None).await;
    assert_eq!(body["total_count"], 0);

    // Gate passes with direction filter
    let (status, _) = send(
        &app,
        "POST",
        "/gate-passes",
        tenant,
        Some(json!({
            "pass_number": "GP-001",
            "party": "Khan & Co",
            "item": "Cement bags",
            "quantity": 200,
            "direction": "outward",
            "date": "2026-04-03"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/gate-passes?direction=outward", tenant, None).await;
    assert_eq!(body["total_count"], 1);
    let (_, body) = send(&app, "GET", "/gate-passes?direction=inward", tenant, None).await;
    assert_eq!(body["total_count"], 0);
}

#[tokio::test]
async fn test_balances_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let tenant = Some("acme_traders");

    for (name, kind, opening) in [("Cash", "asset", 5000), ("Sales", "income", 0)] {
        let (status, _) = send(
            &app,
            "POST",
            "/accounts",
            tenant,
            Some(json!({ "name": name, "kind": kind, "opening_balance_cents": opening })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    send(&app, "POST", "/vouchers", tenant, Some(cash_voucher_body("2026-03-01", 1000))).await;

    let (status, body) = send(&app, "GET", "/vouchers/balances", tenant, None).await;
    assert_eq!(status, StatusCode::OK);
    let balances = body["balances"].as_array().unwrap();
    assert_eq!(balances.len(), 2);

    let cash = balances.iter().find(|b| b["account"] == "Cash").unwrap();
    assert_eq!(cash["balance_cents"], 6000);
    let sales = balances.iter().find(|b| b["account"] == "Sales").unwrap();
    assert_eq!(sales["balance_cents"], -1000);
}

#[tokio::test]
async fn test_auth_and_activity_trail() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let tenant = Some("acme_traders");

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        tenant,
        Some(json!({
            "username": "clerk",
            "display_name": "Front Desk",
            "password": "correct horse battery"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // The hash never leaves the server
    assert!(body["user"].get("password_hash").is_none());

    // Wrong password
    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        tenant,
        Some(json!({ "username": "clerk", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AUTH_FAILED");

    // Right password issues a token
    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        tenant,
        Some(json!({ "username": "clerk", "password": "correct horse battery" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["username"], "clerk");

    let (status, _) = send(
        &app,
        "POST",
        "/auth/logout",
        tenant,
        Some(json!({ "username": "clerk" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Audit trail recorded create + login + logout, newest first
    let (status, body) = send(&app, "GET", "/activities", tenant, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 3);
    let actions: Vec<&str> = body["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["logout", "login", "create"]);
}
