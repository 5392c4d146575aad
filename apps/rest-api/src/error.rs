//! # API Error Type
//!
//! Unified error type for REST handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Error Flow in Meridian Books                           │
//! │                                                                         │
//! │  Client                       Rust Backend                              │
//! │  ──────                       ────────────                              │
//! │                                                                         │
//! │  POST /vouchers                                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<Json<T>, ApiError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation Error? ── ValidationError ──────┐                    │  │
//! │  │  Database Error?  ─── DbError ──────────── ApiError ──► 4xx/5xx │  │
//! │  │  Business Rule?   ─── CoreError ────────────┘                    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── { "message": "Voucher CV-14 is already void",                   │
//! │          "error": "BUSINESS_RULE" }                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal detail (SQL messages, hash failures) is logged via `tracing`
//! and replaced with a generic message before it reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use meridian_core::{CoreError, ValidationError};
use meridian_db::DbError;

/// API error returned from REST handlers.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "message": "Voucher not found: abc-123",
///   "error": "NOT_FOUND"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed, bad/missing tenant header (400)
    ValidationError,

    /// Business logic conflict: double void, duplicate name (422)
    BusinessRule,

    /// Login failed (401)
    AuthFailed,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// The HTTP status this code maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::BusinessRule => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::AuthFailed => StatusCode::UNAUTHORIZED,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a business rule error.
    pub fn business(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BusinessRule, message)
    }

    /// Creates an authentication failure.
    pub fn auth(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::AuthFailed, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Serializes the `{ message, error }` envelope with the mapped status.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "message": self.message,
            "error": self.code,
        }));
        (self.code.status(), body).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value: _ } => {
                ApiError::business(format!("{} already exists", field))
            }
            DbError::InvalidTenant(tenant) => {
                ApiError::validation(format!("Invalid tenant identifier: {}", tenant))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::PasswordHash(e) => {
                tracing::error!("Password hashing failed: {}", e);
                ApiError::internal("Password hashing failed")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::VoucherNotFound(id) => ApiError::not_found("Voucher", &id),
            CoreError::AccountNotFound(name) => ApiError::not_found("Account", &name),
            CoreError::AlreadyVoid(code) => {
                ApiError::business(format!("Voucher {} is already void", code))
            }
            CoreError::NotVoid(code) => {
                ApiError::business(format!("Voucher {} is not void", code))
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts validation errors directly (handlers call validators inline).
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ValidationError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::BusinessRule.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ErrorCode::AuthFailed.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ErrorCode::DatabaseError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_db_error_conversion() {
        let api: ApiError = DbError::not_found("Voucher", "abc").into();
        assert!(matches!(api.code, ErrorCode::NotFound));
        assert_eq!(api.message, "Voucher not found: abc");

        let api: ApiError = DbError::InvalidTenant("..".to_string()).into();
        assert!(matches!(api.code, ErrorCode::ValidationError));
    }

    #[test]
    fn test_core_error_conversion() {
        let api: ApiError = CoreError::AlreadyVoid("CV-1".to_string()).into();
        assert!(matches!(api.code, ErrorCode::BusinessRule));
    }
}
