use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::errors::StoreError;
use crate::types::db::role;

/// Repository for the fixed role set seeded at initialization
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<role::Model>, StoreError> {
        Ok(role::Entity::find()
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<role::Model>, StoreError> {
        Ok(role::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<role::Model>, StoreError> {
        Ok(role::Entity::find()
            .filter(role::Column::Code.eq(code))
            .one(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_store() -> RoleStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        RoleStore::new(db)
    }

    #[tokio::test]
    async fn test_fixed_role_set_is_seeded() {
        let store = setup_store().await;

        let roles = store.list().await.expect("list failed");
        let codes: Vec<&str> = roles.iter().map(|r| r.code.as_str()).collect();

        assert_eq!(codes, vec!["ADMIN", "QLTB", "TK", "NV"]);
        assert!(roles.iter().all(|r| r.is_active));
    }

    #[tokio::test]
    async fn test_find_by_code() {
        let store = setup_store().await;

        let admin = store
            .find_by_code("ADMIN")
            .await
            .expect("query failed")
            .expect("ADMIN role missing");
        assert_eq!(admin.name, "Quản trị hệ thống");

        assert!(store
            .find_by_code("NOPE")
            .await
            .expect("query failed")
            .is_none());
    }
}
