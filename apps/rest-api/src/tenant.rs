//! # Tenant Extractor
//!
//! Every route except `/health` is scoped to a tenant database named by the
//! `x-tenant-db` request header. This extractor resolves the header through
//! the process-wide [`meridian_db::TenantRegistry`]: cached pool on a hit,
//! open-and-migrate on the first request for a tenant.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;

use meridian_db::Database;

use crate::error::ApiError;
use crate::AppState;

/// Name of the header carrying the tenant database name.
pub const TENANT_HEADER: &str = "x-tenant-db";

/// The resolved tenant for this request.
pub struct Tenant {
    /// Tenant name as sent in the header.
    pub name: String,
    /// The tenant's database handle.
    pub db: Database,
}

impl FromRequestParts<Arc<AppState>> for Tenant {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ApiError::validation(format!("Missing {} header", TENANT_HEADER))
            })?
            .to_string();

        let db = state.tenants.database(&name).await?;

        Ok(Tenant { name, db })
    }
}
