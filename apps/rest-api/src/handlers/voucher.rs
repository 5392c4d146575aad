//! Voucher handlers: create, list, get, update, void/unvoid, delete, and
//! the aggregate endpoints.

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;

use meridian_core::{page_count, validation, CoreError, EntryLine, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use meridian_db::{NewVoucher, UpdateVoucher, VoucherFilter};

use crate::auth::MaybeActor;
use crate::dto::{
    start_of_day, start_of_next_day, BalancesQuery, BalancesResponse, CreateVoucherRequest,
    ListVouchersQuery, MessageResponse, TotalsQuery, TotalsResponse, UpdateVoucherRequest,
    VoucherListItem, VoucherListResponse, VoucherResponse,
};
use crate::error::ApiError;
use crate::tenant::Tenant;

/// `POST /vouchers`
///
/// Creates the header, its per-account entry batches, and the audit record
/// in one transaction; returns the posted entry lines.
pub async fn create(
    tenant: Tenant,
    MaybeActor(actor): MaybeActor,
    Json(req): Json<CreateVoucherRequest>,
) -> Result<(StatusCode, Json<VoucherResponse>), ApiError> {
    validation::validate_narration(req.narration.as_deref())?;
    validation::validate_transaction_lines(&req.transactions)?;

    let (voucher, entries) = tenant
        .db
        .vouchers()
        .create(NewVoucher {
            voucher_type: req.voucher_type,
            date: start_of_day(req.date),
            narration: req.narration,
            is_posted: req.is_posted,
            lines: req.transactions,
            actor,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(VoucherResponse {
            message: format!("Voucher {} created", voucher.code),
            voucher,
            entries: Some(entries),
        }),
    ))
}

/// `GET /vouchers`
///
/// Filterable, paginated listing. With `include_entries=true` the entry
/// lines are fetched as a second query and merged in memory by voucher id.
pub async fn list(
    tenant: Tenant,
    Query(q): Query<ListVouchersQuery>,
) -> Result<Json<VoucherListResponse>, ApiError> {
    let limit = q.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);

    // A single `date` is shorthand for a one-day [from, to) range.
    let (date_from, date_to) = match q.date {
        Some(date) => (Some(start_of_day(date)), Some(start_of_next_day(date))),
        None => (
            q.from.map(start_of_day),
            q.to.map(start_of_next_day),
        ),
    };

    let page = tenant
        .db
        .vouchers()
        .list(VoucherFilter {
            voucher_type: q.voucher_type,
            is_void: q.void,
            date_from,
            date_to,
            search: q.search.filter(|s| !s.trim().is_empty()),
            account: q.account,
            skip: q.skip,
            limit,
            sort: q.sort.unwrap_or_default(),
        })
        .await?;

    let mut entries_by_voucher: HashMap<String, Vec<EntryLine>> = HashMap::new();
    if q.include_entries {
        let ids: Vec<String> = page.vouchers.iter().map(|v| v.id.clone()).collect();
        for line in tenant.db.entries().lines_for_vouchers(&ids).await? {
            entries_by_voucher
                .entry(line.voucher_id.clone())
                .or_default()
                .push(line);
        }
    }

    let vouchers = page
        .vouchers
        .into_iter()
        .map(|voucher| {
            let entries = q
                .include_entries
                .then(|| entries_by_voucher.remove(&voucher.id).unwrap_or_default());
            VoucherListItem { voucher, entries }
        })
        .collect();

    Ok(Json(VoucherListResponse {
        message: "Vouchers fetched".to_string(),
        vouchers,
        total_count: page.total,
        page_count: page_count(page.total, limit),
    }))
}

/// `GET /vouchers/{id}`
pub async fn get(
    tenant: Tenant,
    Path(id): Path<String>,
) -> Result<Json<VoucherResponse>, ApiError> {
    let voucher = tenant
        .db
        .vouchers()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Voucher", &id))?;

    let entries = tenant.db.entries().lines_for_voucher(&id).await?;

    Ok(Json(VoucherResponse {
        message: "Voucher fetched".to_string(),
        voucher,
        entries: Some(entries),
    }))
}

/// `PUT /vouchers/{id}`
pub async fn update(
    tenant: Tenant,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<String>,
    Json(req): Json<UpdateVoucherRequest>,
) -> Result<Json<VoucherResponse>, ApiError> {
    validation::validate_narration(req.narration.as_deref())?;

    let voucher = tenant
        .db
        .vouchers()
        .update(
            &id,
            UpdateVoucher {
                date: req.date.map(start_of_day),
                narration: req.narration,
                is_posted: req.is_posted,
                actor,
            },
        )
        .await?;

    Ok(Json(VoucherResponse {
        message: format!("Voucher {} updated", voucher.code),
        voucher,
        entries: None,
    }))
}

/// `POST /vouchers/{id}/void`
pub async fn void(
    tenant: Tenant,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<String>,
) -> Result<Json<VoucherResponse>, ApiError> {
    set_void(tenant, actor, id, true).await
}

/// `POST /vouchers/{id}/unvoid`
pub async fn unvoid(
    tenant: Tenant,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<String>,
) -> Result<Json<VoucherResponse>, ApiError> {
    set_void(tenant, actor, id, false).await
}

async fn set_void(
    tenant: Tenant,
    actor: Option<String>,
    id: String,
    void: bool,
) -> Result<Json<VoucherResponse>, ApiError> {
    let current = tenant
        .db
        .vouchers()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Voucher", &id))?;

    if current.is_void == void {
        let err = if void {
            CoreError::AlreadyVoid(current.code)
        } else {
            CoreError::NotVoid(current.code)
        };
        return Err(err.into());
    }

    let voucher = tenant
        .db
        .vouchers()
        .set_void(&id, void, actor.as_deref())
        .await?;

    let message = if void {
        format!("Voucher {} voided", voucher.code)
    } else {
        format!("Voucher {} restored", voucher.code)
    };

    Ok(Json(VoucherResponse {
        message,
        voucher,
        entries: None,
    }))
}

/// `DELETE /vouchers/{id}`
pub async fn delete(
    tenant: Tenant,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    tenant.db.vouchers().delete(&id, actor.as_deref()).await?;

    Ok(Json(MessageResponse {
        message: "Voucher deleted".to_string(),
    }))
}

/// `GET /vouchers/totals/{account}`
///
/// Sum of non-void entry debits/credits for one account, optionally up to
/// an exclusive cutoff date.
pub async fn totals(
    tenant: Tenant,
    Path(account): Path<String>,
    Query(q): Query<TotalsQuery>,
) -> Result<Json<TotalsResponse>, ApiError> {
    let totals = tenant
        .db
        .vouchers()
        .account_totals(&account, q.until.map(start_of_day))
        .await?;

    Ok(Json(TotalsResponse {
        message: "Totals fetched".to_string(),
        totals,
    }))
}

/// `GET /vouchers/balances`
///
/// Opening balance plus ledger movement per account master, as of an
/// optional cutoff - the opening-balance screen.
pub async fn balances(
    tenant: Tenant,
    Query(q): Query<BalancesQuery>,
) -> Result<Json<BalancesResponse>, ApiError> {
    let balances = tenant
        .db
        .vouchers()
        .account_balances(q.as_of.map(start_of_day))
        .await?;

    Ok(Json(BalancesResponse {
        message: "Balances fetched".to_string(),
        balances: balances.into_iter().map(Into::into).collect(),
    }))
}
