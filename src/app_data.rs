use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::api::AuthGate;
use crate::audit::AuditRecorder;
use crate::auth::token::TokenService;
use crate::config::JwtSettings;
use crate::services::AuthService;
use crate::stores::{AuditStore, DepartmentStore, RoleStore, SupplierStore, UserStore};

/// Centralized application data following the main-owned stores pattern.
///
/// All stores and services are created once here and shared across the API
/// structs, so every endpoint sees the same connection pool and the same
/// signing policy.
pub struct AppData {
    pub db: DatabaseConnection,
    pub token_service: Arc<TokenService>,
    pub gate: Arc<AuthGate>,
    pub audit: Arc<AuditRecorder>,
    pub user_store: Arc<UserStore>,
    pub role_store: Arc<RoleStore>,
    pub department_store: Arc<DepartmentStore>,
    pub supplier_store: Arc<SupplierStore>,
    pub auth_service: Arc<AuthService>,
}

impl AppData {
    /// Wire up stores and services over an already-migrated connection.
    ///
    /// The audit recorder is created first since every mutating store path
    /// reports through it.
    pub fn init(db: DatabaseConnection, jwt_settings: JwtSettings) -> Self {
        tracing::debug!("creating stores and services");

        let audit_store = Arc::new(AuditStore::new(db.clone()));
        let audit = Arc::new(AuditRecorder::new(audit_store));

        let user_store = Arc::new(UserStore::new(db.clone()));
        let role_store = Arc::new(RoleStore::new(db.clone()));
        let department_store = Arc::new(DepartmentStore::new(db.clone()));
        let supplier_store = Arc::new(SupplierStore::new(db.clone()));

        let token_service = Arc::new(TokenService::new(jwt_settings));
        let gate = Arc::new(AuthGate::new(token_service.clone()));

        let auth_service = Arc::new(AuthService::new(
            user_store.clone(),
            token_service.clone(),
            audit.clone(),
        ));

        tracing::info!("application data initialized");

        Self {
            db,
            token_service,
            gate,
            audit,
            user_store,
            role_store,
            department_store,
            supplier_store,
            auth_service,
        }
    }
}
