use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryOrder, Set,
};

use crate::errors::StoreError;
use crate::types::db::supplier;
use crate::types::dto::supplier::SupplierRequest;

/// Repository for equipment suppliers
pub struct SupplierStore {
    db: DatabaseConnection,
}

impl SupplierStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<supplier::Model>, StoreError> {
        Ok(supplier::Entity::find()
            .order_by_asc(supplier::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<supplier::Model>, StoreError> {
        Ok(supplier::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create(
        &self,
        req: SupplierRequest,
        created_by_user_id: Option<i64>,
    ) -> Result<supplier::Model, StoreError> {
        let model = supplier::ActiveModel {
            id: NotSet,
            name: Set(req.name),
            tax_code: Set(req.tax_code.unwrap_or_default()),
            contact_person: Set(req.contact_person.unwrap_or_default()),
            phone: Set(req.phone),
            email: Set(req.email.unwrap_or_default()),
            address: Set(req.address.unwrap_or_default()),
            note: Set(req.note.unwrap_or_default()),
            created_by_user_id: Set(created_by_user_id),
            created_at: Set(Utc::now().timestamp()),
        };

        Ok(model.insert(&self.db).await?)
    }

    pub async fn update(&self, id: i32, req: SupplierRequest) -> Result<supplier::Model, StoreError> {
        let existing = supplier::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        let mut model = existing.into_active_model();
        model.name = Set(req.name);
        model.tax_code = Set(req.tax_code.unwrap_or_default());
        model.contact_person = Set(req.contact_person.unwrap_or_default());
        model.phone = Set(req.phone);
        model.email = Set(req.email.unwrap_or_default());
        model.address = Set(req.address.unwrap_or_default());
        model.note = Set(req.note.unwrap_or_default());

        Ok(model.update(&self.db).await?)
    }

    /// Delete a supplier, returning the removed row for the audit snapshot
    pub async fn delete(&self, id: i32) -> Result<supplier::Model, StoreError> {
        let existing = supplier::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        supplier::Entity::delete_by_id(id).exec(&self.db).await?;

        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_store() -> SupplierStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        SupplierStore::new(db)
    }

    fn sample_supplier() -> SupplierRequest {
        SupplierRequest {
            name: "Công ty TNHH Thiết Bị Y Tế ABC".to_string(),
            tax_code: Some("0312345678".to_string()),
            contact_person: Some("Trần Thị B".to_string()),
            phone: "02838123456".to_string(),
            email: None,
            address: None,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_crud_round_trip() {
        let store = setup_store().await;

        let created = store
            .create(sample_supplier(), Some(1))
            .await
            .expect("create failed");
        assert_eq!(created.created_by_user_id, Some(1));
        assert_eq!(created.email, "");

        let mut req = sample_supplier();
        req.email = Some("lienhe@abc.vn".to_string());
        let updated = store.update(created.id, req).await.expect("update failed");
        assert_eq!(updated.email, "lienhe@abc.vn");

        let removed = store.delete(created.id).await.expect("delete failed");
        assert_eq!(removed.id, created.id);
        assert!(store.list().await.expect("list failed").is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_supplier_is_not_found() {
        let store = setup_store().await;

        let result = store.update(999, sample_supplier()).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }
}
