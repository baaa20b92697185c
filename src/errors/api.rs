use poem_openapi::{payload::Json, ApiResponse};

use crate::errors::internal::StoreError;
use crate::types::dto::common::ErrorResponse;

/// Standardized error responses for protected resource endpoints
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Missing, malformed, or expired bearer token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Valid token but the required role code is not present
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Conflict or referential-integrity refusal
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Record not found
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl ApiError {
    /// Create an Unauthorized error
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(Json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: "Authentication required".to_string(),
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden() -> Self {
        ApiError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: "Insufficient role for this operation".to_string(),
            status_code: 403,
        }))
    }

    /// Create a BadRequest error with a descriptive message
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(Json(ErrorResponse {
            error: "bad_request".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    /// Create a NotFound error with a descriptive message
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: message.into(),
            status_code: 404,
        }))
    }

    /// Create an InternalError. The detail is logged, never returned.
    pub fn internal() -> Self {
        ApiError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "Internal server error".to_string(),
            status_code: 500,
        }))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::not_found("Record not found"),
            StoreError::DuplicateUserName(_)
            | StoreError::DuplicateHisCode(_)
            | StoreError::DuplicateDepartmentCode(_)
            | StoreError::DuplicateRoleAssignment
            | StoreError::DepartmentInUse(_)
            | StoreError::RoleNotFound(_) => ApiError::bad_request(err.to_string()),
            StoreError::Database(e) => {
                tracing::error!(error = %e, "store operation failed");
                ApiError::internal()
            }
            StoreError::Hash(e) => {
                tracing::error!(error = %e, "password hashing failed");
                ApiError::internal()
            }
        }
    }
}
