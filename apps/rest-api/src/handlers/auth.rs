//! Login/logout handlers.
//!
//! Login verifies the Argon2 hash, issues a JWT, and appends a `login`
//! activity record. The token is never REQUIRED elsewhere; when a request
//! carries one, it only names the actor on audit records.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::{info, warn};

use meridian_core::ActivityAction;
use meridian_db::verify_password;

use crate::auth::MaybeActor;
use crate::dto::{LoginRequest, LoginResponse, LogoutRequest, MessageResponse};
use crate::error::ApiError;
use crate::tenant::Tenant;
use crate::AppState;

/// `POST /auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    tenant: Tenant,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = tenant
        .db
        .users()
        .get_by_username(&req.username)
        .await?;

    let user = match user {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        _ => {
            warn!(username = %req.username, tenant = %tenant.name, "Login failed");
            return Err(ApiError::auth("Invalid username or password"));
        }
    };

    let token = state.jwt.generate_access_token(&user.username, &tenant.name)?;

    tenant
        .db
        .activity()
        .append(
            ActivityAction::Login,
            "user",
            &user.id,
            Some(&user.username),
            None,
        )
        .await?;

    info!(username = %user.username, tenant = %tenant.name, "Login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

/// `POST /auth/logout`
///
/// Purely an audit event: there is no server-side session to destroy.
pub async fn logout(
    tenant: Tenant,
    MaybeActor(actor): MaybeActor,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let username = actor.or(req.username).unwrap_or_else(|| "unknown".to_string());

    tenant
        .db
        .activity()
        .append(
            ActivityAction::Logout,
            "user",
            &username,
            Some(&username),
            None,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Logout recorded".to_string(),
    }))
}
