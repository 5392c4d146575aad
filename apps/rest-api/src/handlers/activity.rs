//! Audit trail listing handler.

use axum::extract::Query;
use axum::Json;

use meridian_core::{page_count, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

use crate::dto::{ActivityListResponse, ListQuery};
use crate::error::ApiError;
use crate::tenant::Tenant;

/// `GET /activities`
///
/// Newest first.
pub async fn list(
    tenant: Tenant,
    Query(q): Query<ListQuery>,
) -> Result<Json<ActivityListResponse>, ApiError> {
    let limit = q.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    let (activities, total) = tenant.db.activity().list(q.skip, limit).await?;

    Ok(Json(ActivityListResponse {
        message: "Activities fetched".to_string(),
        activities,
        total_count: total,
        page_count: page_count(total, limit),
    }))
}
