use std::sync::Arc;

use poem::Request;
use poem_openapi::payload::{Json, PlainText};
use poem_openapi::{OpenApi, Tags};

use crate::api::Api;
use crate::errors::AuthError;
use crate::services::{AuthService, LoginError};
use crate::stores::SeedOutcome;
use crate::types::dto::auth::{LoginRequest, LoginResponse, SeedAdminApiResponse};

/// Authentication API endpoints. These are the only operations reachable
/// without a bearer token.
pub struct AuthApi {
    auth_service: Arc<AuthService>,
}

impl AuthApi {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

impl Api for AuthApi {}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with username and password to receive a bearer token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, AuthError> {
        let source = self.request_source(req);

        match self
            .auth_service
            .login(&body.username, &body.password, &source)
            .await
        {
            Ok(response) => Ok(Json(response)),
            Err(LoginError::InvalidCredentials) => Err(AuthError::invalid_credentials()),
            Err(e) => {
                tracing::error!(error = %e, "login flow failed");
                Err(AuthError::internal())
            }
        }
    }

    /// One-time bootstrap: create the default admin account on an empty
    /// store. Refuses once any account exists.
    #[oai(
        path = "/seed-admin-user",
        method = "post",
        tag = "AuthTags::Authentication"
    )]
    async fn seed_admin_user(&self, req: &Request) -> SeedAdminApiResponse {
        let source = self.request_source(req);

        match self.auth_service.seed_admin(&source).await {
            Ok(SeedOutcome::Created(_)) => SeedAdminApiResponse::Ok(PlainText(
                "Đã tạo user: ADMIN001 / mật khẩu: 123456 với quyền Admin".to_string(),
            )),
            Ok(SeedOutcome::AlreadyProvisioned) => SeedAdminApiResponse::Conflict(PlainText(
                "Database đã có dữ liệu user.".to_string(),
            )),
            Err(e) => {
                tracing::error!(error = %e, "seed admin failed");
                SeedAdminApiResponse::InternalError(Json(
                    crate::types::dto::common::ErrorResponse {
                        error: "internal_error".to_string(),
                        message: "Internal server error".to_string(),
                        status_code: 500,
                    },
                ))
            }
        }
    }
}
