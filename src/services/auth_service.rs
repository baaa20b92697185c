use std::sync::Arc;

use serde_json::json;

use crate::audit::{AuditAction, AuditEntry, AuditRecorder};
use crate::auth::password::verify_password;
use crate::auth::token::{TokenError, TokenService};
use crate::errors::StoreError;
use crate::stores::{SeedOutcome, UserStore};
use crate::types::dto::auth::{LoginResponse, PublicUserProfile};

/// Origin of the request, captured for the audit trail
#[derive(Debug, Clone, Default)]
pub struct RequestSource {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Login flow failures. Unknown handle and wrong password collapse into a
/// single variant so no caller can tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Orchestrates credential verification, token issuance, and the audit
/// contract around both.
pub struct AuthService {
    user_store: Arc<UserStore>,
    token_service: Arc<TokenService>,
    audit: Arc<AuditRecorder>,
}

impl AuthService {
    pub fn new(
        user_store: Arc<UserStore>,
        token_service: Arc<TokenService>,
        audit: Arc<AuditRecorder>,
    ) -> Self {
        Self {
            user_store,
            token_service,
            audit,
        }
    }

    /// Complete login flow: account lookup by handle, password
    /// verification, token issuance, and an audit entry for either
    /// outcome. The response never carries the password digest.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        source: &RequestSource,
    ) -> Result<LoginResponse, LoginError> {
        let found = self.user_store.find_by_his_code_with_roles(username).await?;

        let Some((user, roles)) = found else {
            self.record_login(None, username, false, source).await;
            return Err(LoginError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            // Failure entries carry no actor; the attempted handle is kept
            // in new_data only
            self.record_login(None, username, false, source).await;
            return Err(LoginError::InvalidCredentials);
        }

        let token = self.token_service.issue(&user, &roles)?;

        self.record_login(Some(user.id), username, true, source).await;
        tracing::info!(user_id = user.id, "login succeeded");

        Ok(LoginResponse {
            token,
            user: PublicUserProfile {
                id: user.id,
                full_name: user.full_name,
                his_code: user.his_code_acc,
                roles: roles.into_iter().map(|r| r.code).collect(),
            },
        })
    }

    /// One-time bootstrap provisioning; see [`UserStore::seed_admin`].
    /// Successful provisioning is audited as a system-initiated action.
    pub async fn seed_admin(&self, source: &RequestSource) -> Result<SeedOutcome, StoreError> {
        let outcome = self.user_store.seed_admin().await?;

        if let SeedOutcome::Created(admin) = &outcome {
            let entry = AuditEntry::new(AuditAction::Insert, "users")
                .record_id(admin.id)
                .new_data(json!({
                    "his_code_acc": admin.his_code_acc,
                    "full_name": admin.full_name,
                    "seeded": true,
                }))
                .source(source.ip_address.clone(), source.user_agent.clone());
            self.audit.record(entry).await;

            tracing::warn!(
                user_id = admin.id,
                "bootstrap admin account provisioned; disable this path once real accounts exist"
            );
        }

        Ok(outcome)
    }

    async fn record_login(
        &self,
        user_id: Option<i64>,
        username: &str,
        success: bool,
        source: &RequestSource,
    ) {
        let mut entry = AuditEntry::new(AuditAction::Login, "users")
            .actor(user_id)
            .new_data(json!({ "username": username }))
            .source(source.ip_address.clone(), source.user_agent.clone());

        if !success {
            entry = entry.failed();
            tracing::info!("login failed");
        }

        self.audit.record(entry).await;
    }
}
