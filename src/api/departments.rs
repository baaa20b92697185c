use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::api::{Api, AuthGate, BearerAuth, RoleRequirement};
use crate::audit::{AuditAction, AuditEntry, AuditRecorder};
use crate::errors::ApiError;
use crate::stores::{DepartmentChanges, DepartmentStore, NewDepartment};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::department::{
    CreateDepartmentRequest, DepartmentResponse, UpdateDepartmentRequest,
};

/// Department endpoints. Any authenticated user may read and mutate, as
/// with the rest of the admin console; the audit trail records every
/// mutation.
pub struct DepartmentsApi {
    gate: Arc<AuthGate>,
    department_store: Arc<DepartmentStore>,
    audit: Arc<AuditRecorder>,
}

impl DepartmentsApi {
    pub fn new(
        gate: Arc<AuthGate>,
        department_store: Arc<DepartmentStore>,
        audit: Arc<AuditRecorder>,
    ) -> Self {
        Self {
            gate,
            department_store,
            audit,
        }
    }
}

#[derive(Tags)]
enum DepartmentTags {
    /// Department endpoints
    Departments,
}

impl Api for DepartmentsApi {}

fn snapshot(dept: &crate::types::db::department::Model) -> serde_json::Value {
    serde_json::to_value(DepartmentResponse::from(dept.clone())).unwrap_or_default()
}

#[OpenApi(prefix_path = "/departments")]
impl DepartmentsApi {
    /// List departments ordered by id
    #[oai(path = "/", method = "get", tag = "DepartmentTags::Departments")]
    async fn list_departments(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<Vec<DepartmentResponse>>, ApiError> {
        self.gate.authorize(&auth, RoleRequirement::Authenticated)?;

        let departments = self.department_store.list().await?;
        Ok(Json(
            departments
                .into_iter()
                .map(DepartmentResponse::from)
                .collect(),
        ))
    }

    /// Fetch one department by id
    #[oai(path = "/:id", method = "get", tag = "DepartmentTags::Departments")]
    async fn get_department(
        &self,
        auth: BearerAuth,
        id: Path<i16>,
    ) -> Result<Json<DepartmentResponse>, ApiError> {
        self.gate.authorize(&auth, RoleRequirement::Authenticated)?;

        let dept = self
            .department_store
            .get(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Không tìm thấy khoa phòng này"))?;

        Ok(Json(DepartmentResponse::from(dept)))
    }

    /// Create a department; the creator id is taken from the verified
    /// claims
    #[oai(path = "/", method = "post", tag = "DepartmentTags::Departments")]
    async fn create_department(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateDepartmentRequest>,
    ) -> Result<Json<DepartmentResponse>, ApiError> {
        let claims = self.gate.authorize(&auth, RoleRequirement::Authenticated)?;
        let body = body.0;

        let created = self
            .department_store
            .create(NewDepartment {
                department_code: body.department_code,
                full_name: body.full_name,
                description: body.description,
                created_by_user_id: claims.user_id(),
            })
            .await?;

        self.audit
            .record(
                AuditEntry::new(AuditAction::Insert, "departments")
                    .actor(claims.user_id())
                    .record_id(created.id)
                    .new_data(snapshot(&created))
                    .source(
                        self.extract_ip_address(req).map(|ip| ip.to_string()),
                        self.extract_user_agent(req),
                    ),
            )
            .await;

        Ok(Json(DepartmentResponse::from(created)))
    }

    /// Update a department; creation metadata is left untouched
    #[oai(path = "/:id", method = "put", tag = "DepartmentTags::Departments")]
    async fn update_department(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i16>,
        body: Json<UpdateDepartmentRequest>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let claims = self.gate.authorize(&auth, RoleRequirement::Authenticated)?;
        let body = body.0;

        let before = self
            .department_store
            .get(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Không tìm thấy khoa phòng"))?;

        let after = self
            .department_store
            .update(
                id.0,
                DepartmentChanges {
                    department_code: body.department_code,
                    full_name: body.full_name,
                    description: body.description,
                    is_active: body.is_active,
                },
            )
            .await?;

        self.audit
            .record(
                AuditEntry::new(AuditAction::Update, "departments")
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

    /// Delete a department; refused while any user still belongs to it
    #[oai(path = "/:id", method = "delete", tag = "DepartmentTags::Departments")]
    async fn delete_department(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i16>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let claims = self.gate.authorize(&auth, RoleRequirement::Authenticated)?;

        let removed = self.department_store.delete(id.0).await.map_err(|e| {
            if matches!(e, crate::errors::StoreError::DepartmentInUse(_)) {
                ApiError::bad_request("Không thể xóa khoa này vì đang có nhân viên trực thuộc!")
            } else {
                ApiError::from(e)
            }
        })?;

        self.audit
            .record(
                AuditEntry::new(AuditAction::Delete, "departments")
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
            message: "Đã xóa khoa phòng thành công".to_string(),
        }))
    }
}
