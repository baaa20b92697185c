// API layer - HTTP endpoints
pub mod auth;
pub mod departments;
pub mod health;
pub mod suppliers;
pub mod users;

use std::net::IpAddr;
use std::sync::Arc;

pub use auth::AuthApi;
pub use departments::DepartmentsApi;
pub use health::HealthApi;
use poem::Request;
use poem_openapi::auth::Bearer;
use poem_openapi::SecurityScheme;
pub use suppliers::SuppliersApi;
pub use users::UsersApi;

use crate::auth::token::{Claims, TokenService};
use crate::errors::ApiError;
use crate::services::RequestSource;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// Per-operation authorization requirement, declared at each endpoint
#[derive(Debug, Clone, Copy)]
pub enum RoleRequirement {
    /// Any valid token suffices
    Authenticated,
    /// Valid token whose role-claim set contains the given code
    Role(&'static str),
}

/// Verifies bearer tokens and enforces per-operation role requirements.
///
/// Verification is in-memory (signature + expiry); it never touches the
/// database. Expired and tampered tokens both collapse into the same 401.
pub struct AuthGate {
    token_service: Arc<TokenService>,
}

impl AuthGate {
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self { token_service }
    }

    pub fn authorize(
        &self,
        auth: &BearerAuth,
        requirement: RoleRequirement,
    ) -> Result<Claims, ApiError> {
        let claims = self.token_service.verify(&auth.0.token).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            ApiError::unauthorized()
        })?;

        match requirement {
            RoleRequirement::Authenticated => Ok(claims),
            RoleRequirement::Role(code) => {
                if claims.has_role(code) {
                    Ok(claims)
                } else {
                    tracing::debug!(required = code, "role requirement not met");
                    Err(ApiError::forbidden())
                }
            }
        }
    }
}

pub trait Api {
    fn extract_ip_address(&self, req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        // Fall back to remote address
        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    fn extract_user_agent(&self, req: &Request) -> Option<String> {
        req.header("User-Agent").map(|ua| ua.to_string())
    }

    /// Capture the request origin for audit entries
    fn request_source(&self, req: &Request) -> RequestSource {
        RequestSource {
            ip_address: self.extract_ip_address(req).map(|ip| ip.to_string()),
            user_agent: self.extract_user_agent(req),
        }
    }
}
