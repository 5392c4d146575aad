//! Sales voucher handlers: the specialized create/list flow with line items
//! instead of free-form transactions.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::Json;

use meridian_core::{page_count, validation, SaleItem, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use meridian_db::{NewSaleItem, NewSalesVoucher, SalesFilter};

use crate::auth::MaybeActor;
use crate::dto::{
    start_of_day, start_of_next_day, CreateSalesVoucherRequest, ListSalesQuery, SalesListItem,
    SalesListResponse, SalesVoucherResponse,
};
use crate::error::ApiError;
use crate::tenant::Tenant;

/// `POST /sales-vouchers`
///
/// Line totals and the grand total are computed server-side and frozen;
/// the ledger posting (party debit, sales credit) rides in the same
/// transaction as the header and items.
pub async fn create(
    tenant: Tenant,
    MaybeActor(actor): MaybeActor,
    Json(req): Json<CreateSalesVoucherRequest>,
) -> Result<(StatusCode, Json<SalesVoucherResponse>), ApiError> {
    validation::validate_name("party_account", &req.party_account)?;
    validation::validate_name("sales_account", &req.sales_account)?;
    validation::validate_narration(req.narration.as_deref())?;
    validation::validate_sale_item_count(req.items.len())?;
    for item in &req.items {
        validation::validate_name("item_name", &item.item_name)?;
        validation::validate_quantity(item.quantity)?;
        validation::validate_cents("rate_cents", item.rate_cents)?;
        validation::validate_discount_bps(item.discount_bps)?;
    }

    let (voucher, items) = tenant
        .db
        .sales()
        .create(NewSalesVoucher {
            date: start_of_day(req.date),
            party_account: req.party_account,
            sales_account: req.sales_account,
            narration: req.narration,
            items: req
                .items
                .into_iter()
                .map(|item| NewSaleItem {
                    item_name: item.item_name,
                    quantity: item.quantity,
                    rate_cents: item.rate_cents,
                    discount_bps: item.discount_bps,
                })
                .collect(),
            actor,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SalesVoucherResponse {
            message: format!("Sales voucher {} created", voucher.code),
            voucher,
            items,
        }),
    ))
}

/// `GET /sales-vouchers`
///
/// Items are fetched as a second query and merged in memory by voucher id.
pub async fn list(
    tenant: Tenant,
    Query(q): Query<ListSalesQuery>,
) -> Result<Json<SalesListResponse>, ApiError> {
    let limit = q.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);

    let (date_from, date_to) = match q.date {
        Some(date) => (Some(start_of_day(date)), Some(start_of_next_day(date))),
        None => (q.from.map(start_of_day), q.to.map(start_of_next_day)),
    };

    let (vouchers, total) = tenant
        .db
        .sales()
        .list(SalesFilter {
            is_void: q.void,
            date_from,
            date_to,
            search: q.search.filter(|s| !s.trim().is_empty()),
            party_account: q.party,
            skip: q.skip,
            limit,
        })
        .await?;

    let mut items_by_voucher: HashMap<String, Vec<SaleItem>> = HashMap::new();
    if q.include_items {
        let ids: Vec<String> = vouchers.iter().map(|v| v.id.clone()).collect();
        for item in tenant.db.sales().items_for_vouchers(&ids).await? {
            items_by_voucher
                .entry(item.voucher_id.clone())
                .or_default()
                .push(item);
        }
    }

    let vouchers = vouchers
        .into_iter()
        .map(|voucher| {
            let items = q
                .include_items
                .then(|| items_by_voucher.remove(&voucher.id).unwrap_or_default());
            SalesListItem { voucher, items }
        })
        .collect();

    Ok(Json(SalesListResponse {
        message: "Sales vouchers fetched".to_string(),
        vouchers,
        total_count: total,
        page_count: page_count(total, limit),
    }))
}
