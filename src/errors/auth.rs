use poem_openapi::{payload::Json, ApiResponse};

use crate::types::dto::common::{ErrorResponse, MessageResponse};

/// Generic login-failure message. Deliberately identical for an unknown
/// handle and a wrong password so the response carries no oracle.
pub const LOGIN_FAILED_MESSAGE: &str = "Sai Tên Đăng Nhập hoặc Mật Khẩu!";

/// Error responses for the authentication endpoints
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid username or password
    #[oai(status = 401)]
    Unauthorized(Json<MessageResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    /// Create the generic credentials-failure error
    pub fn invalid_credentials() -> Self {
        AuthError::Unauthorized(Json(MessageResponse {
            message: LOGIN_FAILED_MESSAGE.to_string(),
        }))
    }

    /// Create an InternalError. The detail is logged, never returned.
    pub fn internal() -> Self {
        AuthError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "Internal server error".to_string(),
            status_code: 500,
        }))
    }
}
