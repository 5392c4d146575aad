//! Account and user master handlers.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::Json;

use meridian_core::{page_count, validation, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use meridian_db::{NewAccount, NewUser};

use crate::auth::MaybeActor;
use crate::dto::{
    AccountListResponse, AccountResponse, CreateAccountRequest, CreateUserRequest, ListQuery,
    UserListResponse, UserResponse,
};
use crate::error::ApiError;
use crate::tenant::Tenant;

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

/// `POST /accounts`
pub async fn create_account(
    tenant: Tenant,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    validation::validate_name("name", &req.name)?;

    let account = tenant
        .db
        .accounts()
        .insert(NewAccount {
            name: req.name,
            kind: req.kind,
            opening_balance_cents: req.opening_balance_cents,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            message: format!("Account {} created", account.name),
            account,
        }),
    ))
}

/// `GET /accounts`
pub async fn list_accounts(
    tenant: Tenant,
    Query(q): Query<ListQuery>,
) -> Result<Json<AccountListResponse>, ApiError> {
    let limit = clamp_limit(q.limit);
    let (accounts, total) = tenant.db.accounts().list(q.skip, limit).await?;

    Ok(Json(AccountListResponse {
        message: "Accounts fetched".to_string(),
        accounts,
        total_count: total,
        page_count: page_count(total, limit),
    }))
}

/// `POST /users`
pub async fn create_user(
    tenant: Tenant,
    MaybeActor(actor): MaybeActor,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validation::validate_username(&req.username)?;
    validation::validate_name("display_name", &req.display_name)?;
    if req.password.len() < 8 {
        return Err(ApiError::validation(
            "password must be at least 8 characters",
        ));
    }

    let user = tenant
        .db
        .users()
        .insert(NewUser {
            username: req.username,
            display_name: req.display_name,
            password: req.password,
            role: req.role,
            actor,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: format!("User {} created", user.username),
            user,
        }),
    ))
}

/// `GET /users`
pub async fn list_users(
    tenant: Tenant,
    Query(q): Query<ListQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let limit = clamp_limit(q.limit);
    let (users, total) = tenant.db.users().list(q.skip, limit).await?;

    Ok(Json(UserListResponse {
        message: "Users fetched".to_string(),
        users,
        total_count: total,
        page_count: page_count(total, limit),
    }))
}
