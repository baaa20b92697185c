use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::StoreError;
use crate::types::db::{department, user};

/// Fields accepted when creating a department
#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub department_code: String,
    pub full_name: String,
    pub description: Option<String>,
    pub created_by_user_id: Option<i64>,
}

/// Fields accepted when updating a department. Creation metadata is never
/// touched by updates.
#[derive(Debug, Clone)]
pub struct DepartmentChanges {
    pub department_code: String,
    pub full_name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Repository for organizational units
pub struct DepartmentStore {
    db: DatabaseConnection,
}

impl DepartmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<department::Model>, StoreError> {
        Ok(department::Entity::find()
            .order_by_asc(department::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get(&self, id: i16) -> Result<Option<department::Model>, StoreError> {
        Ok(department::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create(&self, new: NewDepartment) -> Result<department::Model, StoreError> {
        let clash = department::Entity::find()
            .filter(department::Column::DepartmentCode.eq(&new.department_code))
            .one(&self.db)
            .await?;
        if clash.is_some() {
            return Err(StoreError::DuplicateDepartmentCode(new.department_code));
        }

        let model = department::ActiveModel {
            id: NotSet,
            department_code: Set(new.department_code.clone()),
            full_name: Set(new.full_name),
            description: Set(new.description),
            is_active: Set(true),
            created_by_user_id: Set(new.created_by_user_id),
            created_at: Set(Utc::now().timestamp()),
        };

        model.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                StoreError::DuplicateDepartmentCode(new.department_code)
            } else {
                StoreError::Database(e)
            }
        })
    }

    /// Update a department. When the code changes, the new code must not
    /// collide with any other department.
    pub async fn update(
        &self,
        id: i16,
        changes: DepartmentChanges,
    ) -> Result<department::Model, StoreError> {
        let existing = department::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        if existing.department_code != changes.department_code {
            let clash = department::Entity::find()
                .filter(department::Column::DepartmentCode.eq(&changes.department_code))
                .filter(department::Column::Id.ne(id))
                .one(&self.db)
                .await?;
            if clash.is_some() {
                return Err(StoreError::DuplicateDepartmentCode(changes.department_code));
            }
        }

        let mut model = existing.into_active_model();
        model.department_code = Set(changes.department_code);
        model.full_name = Set(changes.full_name);
        model.description = Set(changes.description);
        model.is_active = Set(changes.is_active);

        Ok(model.update(&self.db).await?)
    }

    /// Number of users attached to a department code; drives the delete
    /// guard.
    pub async fn users_referencing(&self, department_code: &str) -> Result<u64, StoreError> {
        Ok(user::Entity::find()
            .filter(user::Column::DepartmentCode.eq(department_code))
            .count(&self.db)
            .await?)
    }

    /// Delete a department, refusing while any user still references its
    /// code. Returns the removed row for the audit snapshot.
    pub async fn delete(&self, id: i16) -> Result<department::Model, StoreError> {
        let existing = department::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        let attached = self.users_referencing(&existing.department_code).await?;
        if attached > 0 {
            return Err(StoreError::DepartmentInUse(existing.department_code));
        }

        department::Entity::delete_by_id(id).exec(&self.db).await?;

        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::user_store::{NewUser, UserStore};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    fn sample_department(code: &str) -> NewDepartment {
        NewDepartment {
            department_code: code.to_string(),
            full_name: "Khoa Nội".to_string(),
            description: None,
            created_by_user_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_refuses_duplicate_code() {
        let store = DepartmentStore::new(setup_db().await);

        store
            .create(sample_department("KHOA_NOI"))
            .await
            .expect("create failed");

        let result = store.create(sample_department("KHOA_NOI")).await;
        assert!(matches!(
            result,
            Err(StoreError::DuplicateDepartmentCode(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rechecks_code_uniqueness_only_when_changed() {
        let store = DepartmentStore::new(setup_db().await);

        let a = store
            .create(sample_department("KHOA_NOI"))
            .await
            .expect("create failed");
        store
            .create(sample_department("P_IT"))
            .await
            .expect("create failed");

        // Same code, other fields changed: fine
        let ok = store
            .update(
                a.id,
                DepartmentChanges {
                    department_code: "KHOA_NOI".to_string(),
                    full_name: "Khoa Nội Tổng Hợp".to_string(),
                    description: Some("đã đổi tên".to_string()),
                    is_active: true,
                },
            )
            .await
            .expect("update failed");
        assert_eq!(ok.full_name, "Khoa Nội Tổng Hợp");

        // Changing to another department's code: conflict
        let clash = store
            .update(
                a.id,
                DepartmentChanges {
                    department_code: "P_IT".to_string(),
                    full_name: "Khoa Nội".to_string(),
                    description: None,
                    is_active: true,
                },
            )
            .await;
        assert!(matches!(
            clash,
            Err(StoreError::DuplicateDepartmentCode(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_refused_while_users_reference_the_code() {
        let db = setup_db().await;
        let departments = DepartmentStore::new(db.clone());
        let users = UserStore::new(db);

        let dept = departments
            .create(sample_department("CNTT"))
            .await
            .expect("create failed");

        let member = users
            .create(NewUser {
                full_name: "Nguyễn Văn A".to_string(),
                user_name: "nva".to_string(),
                his_code_acc: "HIS001".to_string(),
                password: "password123".to_string(),
                phone_number: String::new(),
                job_title: String::new(),
                department_code: Some("CNTT".to_string()),
                created_by_user_id: None,
            })
            .await
            .expect("user create failed");

        let refused = departments.delete(dept.id).await;
        assert!(matches!(refused, Err(StoreError::DepartmentInUse(_))));
        assert!(departments
            .get(dept.id)
            .await
            .expect("get failed")
            .is_some());

        // Detach the user, then deletion succeeds
        users.delete(member.id).await.expect("user delete failed");
        departments.delete(dept.id).await.expect("delete failed");
        assert!(departments
            .get(dept.id)
            .await
            .expect("get failed")
            .is_none());
    }
}
