//! Master record handlers: gate passes, stock items, categories.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::Json;

use meridian_core::{page_count, validation, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use meridian_db::{NewCategory, NewGatePass, NewStock};

use crate::auth::MaybeActor;
use crate::dto::{
    start_of_day, CategoryListResponse, CategoryResponse, CreateCategoryRequest,
    CreateGatePassRequest, CreateStockRequest, GatePassListResponse, GatePassResponse,
    ListGatePassQuery, ListQuery, ListStockQuery, StockListResponse, StockResponse,
};
use crate::error::ApiError;
use crate::tenant::Tenant;

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

// =============================================================================
// Gate Passes
// =============================================================================

/// `POST /gate-passes`
pub async fn create_gate_pass(
    tenant: Tenant,
    MaybeActor(actor): MaybeActor,
    Json(req): Json<CreateGatePassRequest>,
) -> Result<(StatusCode, Json<GatePassResponse>), ApiError> {
    validation::validate_name("pass_number", &req.pass_number)?;
    validation::validate_name("party", &req.party)?;
    validation::validate_name("item", &req.item)?;
    validation::validate_quantity(req.quantity)?;

    let gate_pass = tenant
        .db
        .gate_passes()
        .insert(NewGatePass {
            pass_number: req.pass_number,
            party: req.party,
            vehicle: req.vehicle,
            item: req.item,
            quantity: req.quantity,
            direction: req.direction,
            date: start_of_day(req.date),
            actor,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GatePassResponse {
            message: format!("Gate pass {} created", gate_pass.pass_number),
            gate_pass,
        }),
    ))
}

/// `GET /gate-passes`
pub async fn list_gate_passes(
    tenant: Tenant,
    Query(q): Query<ListGatePassQuery>,
) -> Result<Json<GatePassListResponse>, ApiError> {
    let limit = clamp_limit(q.limit);
    let (gate_passes, total) = tenant
        .db
        .gate_passes()
        .list(q.direction, q.skip, limit)
        .await?;

    Ok(Json(GatePassListResponse {
        message: "Gate passes fetched".to_string(),
        gate_passes,
        total_count: total,
        page_count: page_count(total, limit),
    }))
}

// =============================================================================
// Stock
// =============================================================================

/// `POST /stocks`
pub async fn create_stock(
    tenant: Tenant,
    MaybeActor(actor): MaybeActor,
    Json(req): Json<CreateStockRequest>,
) -> Result<(StatusCode, Json<StockResponse>), ApiError> {
    validation::validate_name("name", &req.name)?;
    validation::validate_name("category", &req.category)?;
    validation::validate_name("unit", &req.unit)?;
    validation::validate_cents("rate_cents", req.rate_cents)?;
    if req.opening_qty < 0 {
        return Err(ApiError::validation("opening_qty must not be negative"));
    }

    let stock = tenant
        .db
        .stocks()
        .insert(NewStock {
            name: req.name,
            category: req.category,
            unit: req.unit,
            opening_qty: req.opening_qty,
            rate_cents: req.rate_cents,
            actor,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StockResponse {
            message: format!("Stock {} created", stock.name),
            stock,
        }),
    ))
}

/// `GET /stocks`
pub async fn list_stocks(
    tenant: Tenant,
    Query(q): Query<ListStockQuery>,
) -> Result<Json<StockListResponse>, ApiError> {
    let limit = clamp_limit(q.limit);
    let (stocks, total) = tenant
        .db
        .stocks()
        .list(q.category.as_deref(), q.skip, limit)
        .await?;

    Ok(Json(StockListResponse {
        message: "Stocks fetched".to_string(),
        stocks,
        total_count: total,
        page_count: page_count(total, limit),
    }))
}

// =============================================================================
// Categories
// =============================================================================

/// `POST /categories`
pub async fn create_category(
    tenant: Tenant,
    MaybeActor(actor): MaybeActor,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    validation::validate_name("name", &req.name)?;
    validation::validate_narration(req.description.as_deref())?;

    let category = tenant
        .db
        .categories()
        .insert(NewCategory {
            name: req.name,
            description: req.description,
            actor,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            message: format!("Category {} created", category.name),
            category,
        }),
    ))
}

/// `GET /categories`
pub async fn list_categories(
    tenant: Tenant,
    Query(q): Query<ListQuery>,
) -> Result<Json<CategoryListResponse>, ApiError> {
    let limit = clamp_limit(q.limit);
    let (categories, total) = tenant.db.categories().list(q.skip, limit).await?;

    Ok(Json(CategoryListResponse {
        message: "Categories fetched".to_string(),
        categories,
        total_count: total,
        page_count: page_count(total, limit),
    }))
}
