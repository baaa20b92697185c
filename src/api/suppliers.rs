use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::api::{Api, AuthGate, BearerAuth, RoleRequirement};
use crate::audit::{AuditAction, AuditEntry, AuditRecorder};
use crate::errors::ApiError;
use crate::stores::SupplierStore;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::supplier::{SupplierRequest, SupplierResponse};

/// Supplier endpoints: plain CRUD behind the bearer gate, with audited
/// mutations
pub struct SuppliersApi {
    gate: Arc<AuthGate>,
    supplier_store: Arc<SupplierStore>,
    audit: Arc<AuditRecorder>,
}

impl SuppliersApi {
    pub fn new(
        gate: Arc<AuthGate>,
        supplier_store: Arc<SupplierStore>,
        audit: Arc<AuditRecorder>,
    ) -> Self {
        Self {
            gate,
            supplier_store,
            audit,
        }
    }
}

#[derive(Tags)]
enum SupplierTags {
    /// Supplier endpoints
    Suppliers,
}

impl Api for SuppliersApi {}

fn snapshot(supplier: &crate::types::db::supplier::Model) -> serde_json::Value {
    serde_json::to_value(SupplierResponse::from(supplier.clone())).unwrap_or_default()
}

#[OpenApi(prefix_path = "/suppliers")]
impl SuppliersApi {
    /// List suppliers
    #[oai(path = "/", method = "get", tag = "SupplierTags::Suppliers")]
    async fn list_suppliers(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<Vec<SupplierResponse>>, ApiError> {
        self.gate.authorize(&auth, RoleRequirement::Authenticated)?;

        let suppliers = self.supplier_store.list().await?;
        Ok(Json(
            suppliers.into_iter().map(SupplierResponse::from).collect(),
        ))
    }

    /// Fetch one supplier by id
    #[oai(path = "/:id", method = "get", tag = "SupplierTags::Suppliers")]
    async fn get_supplier(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<SupplierResponse>, ApiError> {
        self.gate.authorize(&auth, RoleRequirement::Authenticated)?;

        let supplier = self
            .supplier_store
            .get(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Không tìm thấy nhà cung cấp"))?;

        Ok(Json(SupplierResponse::from(supplier)))
    }

    /// Create a supplier
    #[oai(path = "/", method = "post", tag = "SupplierTags::Suppliers")]
    async fn create_supplier(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<SupplierRequest>,
    ) -> Result<Json<SupplierResponse>, ApiError> {
        let claims = self.gate.authorize(&auth, RoleRequirement::Authenticated)?;

        let created = self
            .supplier_store
            .create(body.0, claims.user_id())
            .await?;

        self.audit
            .record(
                AuditEntry::new(AuditAction::Insert, "suppliers")
                    .actor(claims.user_id())
                    .record_id(created.id)
                    .new_data(snapshot(&created))
                    .source(
                        self.extract_ip_address(req).map(|ip| ip.to_string()),
                        self.extract_user_agent(req),
                    ),
            )
            .await;

        Ok(Json(SupplierResponse::from(created)))
    }

    /// Update a supplier
    #[oai(path = "/:id", method = "put", tag = "SupplierTags::Suppliers")]
    async fn update_supplier(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<SupplierRequest>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let claims = self.gate.authorize(&auth, RoleRequirement::Authenticated)?;

        let before = self
            .supplier_store
            .get(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Không tìm thấy nhà cung cấp"))?;

        let after = self.supplier_store.update(id.0, body.0).await?;

        self.audit
            .record(
                AuditEntry::new(AuditAction::Update, "suppliers")
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

    /// Delete a supplier
    #[oai(path = "/:id", method = "delete", tag = "SupplierTags::Suppliers")]
    async fn delete_supplier(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let claims = self.gate.authorize(&auth, RoleRequirement::Authenticated)?;

        let removed = self.supplier_store.delete(id.0).await?;

        self.audit
            .record(
                AuditEntry::new(AuditAction::Delete, "suppliers")
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
            message: "Đã xóa nhà cung cấp".to_string(),
        }))
    }
}
