use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::api::{Api, AuthGate, BearerAuth, RoleRequirement};
use crate::audit::{AuditAction, AuditEntry, AuditRecorder};
use crate::errors::ApiError;
use crate::stores::{NewUser, UserChanges, UserStore};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::{AssignRoleRequest, CreateUserRequest, UpdateUserRequest, UserResponse};

/// Account management endpoints. Reads require any valid token; mutations
/// require the administrator role.
pub struct UsersApi {
    gate: Arc<AuthGate>,
    user_store: Arc<UserStore>,
    audit: Arc<AuditRecorder>,
}

impl UsersApi {
    pub fn new(gate: Arc<AuthGate>, user_store: Arc<UserStore>, audit: Arc<AuditRecorder>) -> Self {
        Self {
            gate,
            user_store,
            audit,
        }
    }
}

#[derive(Tags)]
enum UserTags {
    /// Account management endpoints
    Users,
}

impl Api for UsersApi {}

fn snapshot(user: &crate::types::db::user::Model) -> serde_json::Value {
    // Snapshot through the DTO so the password hash never reaches the
    // audit trail
    serde_json::to_value(UserResponse::from(user.clone())).unwrap_or_default()
}

#[OpenApi(prefix_path = "/users")]
impl UsersApi {
    /// List all accounts (password digests omitted)
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    async fn list_users(&self, auth: BearerAuth) -> Result<Json<Vec<UserResponse>>, ApiError> {
        self.gate.authorize(&auth, RoleRequirement::Authenticated)?;

        let users = self.user_store.list().await?;
        Ok(Json(users.into_iter().map(UserResponse::from).collect()))
    }

    /// Profile of the calling user, resolved from the verified claims
    #[oai(path = "/me", method = "get", tag = "UserTags::Users")]
    async fn me(&self, auth: BearerAuth) -> Result<Json<UserResponse>, ApiError> {
        let claims = self.gate.authorize(&auth, RoleRequirement::Authenticated)?;

        let user = self
            .user_store
            .find_by_user_name(&claims.username)
            .await?
            .ok_or_else(|| ApiError::not_found("Người dùng không tồn tại"))?;

        Ok(Json(UserResponse::from(user)))
    }

    /// Fetch one account by id
    #[oai(path = "/:id", method = "get", tag = "UserTags::Users")]
    async fn get_user(
        &self,
        auth: BearerAuth,
        id: Path<i64>,
    ) -> Result<Json<UserResponse>, ApiError> {
        self.gate.authorize(&auth, RoleRequirement::Authenticated)?;

        let user = self
            .user_store
            .get(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Người dùng không tồn tại"))?;

        Ok(Json(UserResponse::from(user)))
    }

    /// Create an account
    #[oai(path = "/", method = "post", tag = "UserTags::Users")]
    async fn create_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let claims = self.gate.authorize(&auth, RoleRequirement::Role("ADMIN"))?;
        let body = body.0;

        let created = self
            .user_store
            .create(NewUser {
                full_name: body.full_name,
                user_name: body.user_name,
                his_code_acc: body.his_code_acc,
                password: body.password,
                phone_number: body.phone_number.unwrap_or_default(),
                job_title: body.job_title.unwrap_or_default(),
                department_code: body.department_code,
                created_by_user_id: claims.user_id(),
            })
            .await?;

        self.audit
            .record(
                AuditEntry::new(AuditAction::Insert, "users")
                    .actor(claims.user_id())
                    .record_id(created.id)
                    .new_data(snapshot(&created))
                    .source(
                        self.extract_ip_address(req).map(|ip| ip.to_string()),
                        self.extract_user_agent(req),
                    ),
            )
            .await;

        Ok(Json(UserResponse::from(created)))
    }

    /// Update an account's profile; rewrites the password digest only when
    /// a new password is supplied
    #[oai(path = "/:id", method = "put", tag = "UserTags::Users")]
    async fn update_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i64>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let claims = self.gate.authorize(&auth, RoleRequirement::Role("ADMIN"))?;
        let body = body.0;

        let before = self
            .user_store
            .get(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Người dùng không tồn tại"))?;

        let after = self
            .user_store
            .update(
                id.0,
                UserChanges {
                    full_name: body.full_name,
                    his_code_acc: body.his_code_acc,
                    phone_number: body.phone_number.unwrap_or_default(),
                    job_title: body.job_title.unwrap_or_default(),
                    department_code: body.department_code,
                    password: body.password,
                },
            )
            .await?;

        self.audit
            .record(
                AuditEntry::new(AuditAction::Update, "users")
                    .actor(claims.user_id())
                    .record_id(after.id)
                    .old_data(snapshot(&before))
                    .new_data(snapshot(&after))
                    .source(
                        self.extract_ip_address(req).map(|ip| ip.to_string()),
                        self.extract_user_agent(req),
                    ),
            )
            .await;

        Ok(Json(MessageResponse {
            message: "Cập nhật thành công".to_string(),
        }))
    }

    /// Delete an account
    #[oai(path = "/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i64>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let claims = self.gate.authorize(&auth, RoleRequirement::Role("ADMIN"))?;

        let removed = self.user_store.delete(id.0).await?;

        self.audit
            .record(
                AuditEntry::new(AuditAction::Delete, "users")
                    .actor(claims.user_id())
                    .record_id(removed.id)
                    .old_data(snapshot(&removed))
                    .source(
                        self.extract_ip_address(req).map(|ip| ip.to_string()),
                        self.extract_user_agent(req),
                    ),
            )
            .await;

        Ok(Json(MessageResponse {
            message: "Đã xóa người dùng".to_string(),
        }))
    }

    /// Grant a role to an account. The (account, role) pair is unique.
    #[oai(path = "/:id/roles", method = "post", tag = "UserTags::Users")]
    async fn assign_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i64>,
        body: Json<AssignRoleRequest>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let claims = self.gate.authorize(&auth, RoleRequirement::Role("ADMIN"))?;

        self.user_store
            .assign_role(id.0, body.role_id, claims.user_id())
            .await?;

        self.audit
            .record(
                AuditEntry::new(AuditAction::Insert, "user_roles")
                    .actor(claims.user_id())
                    .record_id(id.0)
                    .new_data(serde_json::json!({
                        "user_id": id.0,
                        "role_id": body.role_id,
                    }))
                    .source(
                        self.extract_ip_address(req).map(|ip| ip.to_string()),
                        self.extract_user_agent(req),
                    ),
            )
            .await;

        Ok(Json(MessageResponse {
            message: "Đã gán quyền cho người dùng".to_string(),
        }))
    }
}
