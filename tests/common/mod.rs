// Common test utilities for integration tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use medequip_backend::audit::AuditRecorder;
use medequip_backend::auth::token::TokenService;
use medequip_backend::config::JwtSettings;
use medequip_backend::services::AuthService;
use medequip_backend::stores::{AuditStore, UserStore};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Everything the login flow needs, wired over one in-memory database
pub struct AuthStack {
    pub db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
}

pub async fn setup_auth_stack() -> AuthStack {
    let db = setup_test_db().await;

    let audit = Arc::new(AuditRecorder::new(Arc::new(AuditStore::new(db.clone()))));
    let user_store = Arc::new(UserStore::new(db.clone()));
    let token_service = Arc::new(TokenService::new(JwtSettings::new(TEST_SECRET)));

    let auth_service = Arc::new(AuthService::new(
        user_store.clone(),
        token_service.clone(),
        audit,
    ));

    AuthStack {
        db,
        user_store,
        token_service,
        auth_service,
    }
}
