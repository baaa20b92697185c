use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};

use crate::auth::password::hash_password;
use crate::errors::StoreError;
use crate::types::db::{role, user, user_role};

/// Login handle and default password of the bootstrap admin account
pub const SEED_ADMIN_HANDLE: &str = "ADMIN001";
pub const SEED_ADMIN_PASSWORD: &str = "123456";
pub const ADMIN_ROLE_CODE: &str = "ADMIN";

/// Fields accepted when creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub user_name: String,
    pub his_code_acc: String,
    /// Plaintext; hashed before it reaches the database
    pub password: String,
    pub phone_number: String,
    pub job_title: String,
    pub department_code: Option<String>,
    pub created_by_user_id: Option<i64>,
}

/// Fields accepted when updating a user's profile. The login name is
/// deliberately immutable.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub full_name: String,
    pub his_code_acc: String,
    pub phone_number: String,
    pub job_title: String,
    pub department_code: Option<String>,
    /// When present the stored digest is rewritten; it is never read back
    pub password: Option<String>,
}

/// Outcome of the one-time bootstrap provisioning
#[derive(Debug)]
pub enum SeedOutcome {
    Created(user::Model),
    AlreadyProvisioned,
}

/// Repository for accounts and their role assignments
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<user::Model>, StoreError> {
        Ok(user::Entity::find().all(&self.db).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<user::Model>, StoreError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_by_user_name(&self, user_name: &str) -> Result<Option<user::Model>, StoreError> {
        Ok(user::Entity::find()
            .filter(user::Column::UserName.eq(user_name))
            .one(&self.db)
            .await?)
    }

    /// Look up an account by its login handle (HIS code), joined with its
    /// role assignments and role details. This is the login-path query.
    pub async fn find_by_his_code_with_roles(
        &self,
        his_code: &str,
    ) -> Result<Option<(user::Model, Vec<role::Model>)>, StoreError> {
        let mut result = user::Entity::find()
            .filter(user::Column::HisCodeAcc.eq(his_code))
            .find_with_related(role::Entity)
            .all(&self.db)
            .await?;

        Ok(result.pop())
    }

    /// Roles currently assigned to a user
    pub async fn roles_of(&self, user_id: i64) -> Result<Vec<role::Model>, StoreError> {
        let user = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        Ok(user.find_related(role::Entity).all(&self.db).await?)
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    /// Create a user inside a transaction. Duplicate login names and HIS
    /// codes are refused; the unique indexes back the check, so a
    /// concurrent duplicate insert also surfaces as a conflict.
    pub async fn create(&self, new_user: NewUser) -> Result<user::Model, StoreError> {
        let txn = self.db.begin().await?;

        if user::Entity::find()
            .filter(user::Column::UserName.eq(&new_user.user_name))
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(StoreError::DuplicateUserName(new_user.user_name));
        }

        if user::Entity::find()
            .filter(user::Column::HisCodeAcc.eq(&new_user.his_code_acc))
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(StoreError::DuplicateHisCode(new_user.his_code_acc));
        }

        let created = Self::insert_user(&txn, new_user).await?;

        txn.commit().await?;

        Ok(created)
    }

    async fn insert_user<C: ConnectionTrait>(
        conn: &C,
        new_user: NewUser,
    ) -> Result<user::Model, StoreError> {
        let password_hash = hash_password(&new_user.password)?;

        let model = user::ActiveModel {
            id: NotSet,
            full_name: Set(new_user.full_name),
            user_name: Set(new_user.user_name.clone()),
            his_code_acc: Set(new_user.his_code_acc),
            password_hash: Set(password_hash),
            phone_number: Set(new_user.phone_number),
            job_title: Set(new_user.job_title),
            department_code: Set(new_user.department_code),
            created_by_user_id: Set(new_user.created_by_user_id),
            created_at: Set(Utc::now().timestamp()),
        };

        model.insert(conn).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                StoreError::DuplicateUserName(new_user.user_name)
            } else {
                StoreError::Database(e)
            }
        })
    }

    /// Update profile fields; rewrites the password digest only when a new
    /// password is supplied.
    pub async fn update(&self, id: i64, changes: UserChanges) -> Result<user::Model, StoreError> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        if existing.his_code_acc != changes.his_code_acc {
            let clash = user::Entity::find()
                .filter(user::Column::HisCodeAcc.eq(&changes.his_code_acc))
                .filter(user::Column::Id.ne(id))
                .one(&self.db)
                .await?;
            if clash.is_some() {
                return Err(StoreError::DuplicateHisCode(changes.his_code_acc));
            }
        }

        let mut model = existing.into_active_model();
        model.full_name = Set(changes.full_name);
        model.his_code_acc = Set(changes.his_code_acc);
        model.phone_number = Set(changes.phone_number);
        model.job_title = Set(changes.job_title);
        model.department_code = Set(changes.department_code);

        if let Some(password) = changes.password {
            model.password_hash = Set(hash_password(&password)?);
        }

        Ok(model.update(&self.db).await?)
    }

    /// Delete a user, returning the removed row for the audit snapshot
    pub async fn delete(&self, id: i64) -> Result<user::Model, StoreError> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        user::Entity::delete_by_id(id).exec(&self.db).await?;

        Ok(existing)
    }

    /// Assign a role to a user. The (user, role) pair is unique; assigning
    /// an already-held role is a conflict.
    pub async fn assign_role(
        &self,
        user_id: i64,
        role_id: i32,
        assigned_by_user_id: Option<i64>,
    ) -> Result<(), StoreError> {
        let user_exists = user::Entity::find_by_id(user_id).one(&self.db).await?;
        if user_exists.is_none() {
            return Err(StoreError::NotFound);
        }

        let role_exists = role::Entity::find_by_id(role_id).one(&self.db).await?;
        if role_exists.is_none() {
            return Err(StoreError::NotFound);
        }

        let already = user_role::Entity::find_by_id((user_id, role_id))
            .one(&self.db)
            .await?;
        if already.is_some() {
            return Err(StoreError::DuplicateRoleAssignment);
        }

        let assignment = user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
            assigned_at: Set(Utc::now().timestamp()),
            assigned_by_user_id: Set(assigned_by_user_id),
        };

        assignment.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                StoreError::DuplicateRoleAssignment
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(())
    }

    /// One-time bootstrap provisioning: when the store holds no account at
    /// all, create the fixed admin account and grant it the administrator
    /// role, all inside a single transaction. Refuses with
    /// `AlreadyProvisioned` otherwise.
    pub async fn seed_admin(&self) -> Result<SeedOutcome, StoreError> {
        let txn = self.db.begin().await?;

        let existing = user::Entity::find().count(&txn).await?;
        if existing > 0 {
            return Ok(SeedOutcome::AlreadyProvisioned);
        }

        let admin = Self::insert_user(
            &txn,
            NewUser {
                full_name: "Quản Trị Viên Hệ Thống".to_string(),
                user_name: SEED_ADMIN_HANDLE.to_string(),
                his_code_acc: SEED_ADMIN_HANDLE.to_string(),
                password: SEED_ADMIN_PASSWORD.to_string(),
                phone_number: "0999999999".to_string(),
                job_title: "IT Manager".to_string(),
                department_code: Some("CNTT".to_string()),
                created_by_user_id: None,
            },
        )
        .await?;

        let admin_role = role::Entity::find()
            .filter(role::Column::Code.eq(ADMIN_ROLE_CODE))
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::RoleNotFound(ADMIN_ROLE_CODE.to_string()))?;

        let assignment = user_role::ActiveModel {
            user_id: Set(admin.id),
            role_id: Set(admin_role.id),
            assigned_at: Set(Utc::now().timestamp()),
            assigned_by_user_id: Set(None),
        };
        assignment.insert(&txn).await?;

        txn.commit().await?;

        Ok(SeedOutcome::Created(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_store() -> UserStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        UserStore::new(db)
    }

    fn sample_user(user_name: &str, his_code: &str) -> NewUser {
        NewUser {
            full_name: "Nguyễn Văn A".to_string(),
            user_name: user_name.to_string(),
            his_code_acc: his_code.to_string(),
            password: "password123".to_string(),
            phone_number: "0123456789".to_string(),
            job_title: "Kỹ sư".to_string(),
            department_code: None,
            created_by_user_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password_and_stores_user() {
        let store = setup_store().await;

        let created = store
            .create(sample_user("nva", "HIS001"))
            .await
            .expect("create failed");

        assert_ne!(created.password_hash, "password123");
        assert!(created.password_hash.starts_with("$argon2"));
        assert!(verify_password("password123", &created.password_hash));
    }

    #[tokio::test]
    async fn test_create_refuses_duplicate_user_name() {
        let store = setup_store().await;

        store
            .create(sample_user("dup", "HIS001"))
            .await
            .expect("first create failed");

        let result = store.create(sample_user("dup", "HIS002")).await;
        assert!(matches!(result, Err(StoreError::DuplicateUserName(_))));
    }

    #[tokio::test]
    async fn test_create_refuses_duplicate_his_code() {
        let store = setup_store().await;

        store
            .create(sample_user("first", "HIS001"))
            .await
            .expect("first create failed");

        let result = store.create(sample_user("second", "HIS001")).await;
        assert!(matches!(result, Err(StoreError::DuplicateHisCode(_))));
    }

    #[tokio::test]
    async fn test_seed_admin_creates_admin_with_role_exactly_once() {
        let store = setup_store().await;

        let outcome = store.seed_admin().await.expect("seed failed");
        let admin = match outcome {
            SeedOutcome::Created(u) => u,
            SeedOutcome::AlreadyProvisioned => panic!("expected Created on empty store"),
        };

        assert_eq!(admin.his_code_acc, SEED_ADMIN_HANDLE);
        assert!(verify_password(SEED_ADMIN_PASSWORD, &admin.password_hash));

        let roles = store.roles_of(admin.id).await.expect("roles query failed");
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].code, ADMIN_ROLE_CODE);

        // Second invocation refuses and writes nothing
        let second = store.seed_admin().await.expect("second seed errored");
        assert!(matches!(second, SeedOutcome::AlreadyProvisioned));
        assert_eq!(store.count().await.expect("count failed"), 1);
    }

    #[tokio::test]
    async fn test_seed_admin_refuses_when_any_account_exists() {
        let store = setup_store().await;

        store
            .create(sample_user("someone", "HIS009"))
            .await
            .expect("create failed");

        let outcome = store.seed_admin().await.expect("seed errored");
        assert!(matches!(outcome, SeedOutcome::AlreadyProvisioned));
        assert_eq!(store.count().await.expect("count failed"), 1);
    }

    #[tokio::test]
    async fn test_assign_role_enforces_unique_pair() {
        let store = setup_store().await;

        let user = store
            .create(sample_user("nva", "HIS001"))
            .await
            .expect("create failed");

        // Roles 1..4 are seeded by the migration
        store
            .assign_role(user.id, 2, None)
            .await
            .expect("first assignment failed");

        let duplicate = store.assign_role(user.id, 2, None).await;
        assert!(matches!(
            duplicate,
            Err(StoreError::DuplicateRoleAssignment)
        ));

        let roles = store.roles_of(user.id).await.expect("roles query failed");
        assert_eq!(roles.len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_his_code_with_roles_joins_role_details() {
        let store = setup_store().await;

        let user = store
            .create(sample_user("nva", "HIS001"))
            .await
            .expect("create failed");
        store
            .assign_role(user.id, 1, None)
            .await
            .expect("assign failed");
        store
            .assign_role(user.id, 4, None)
            .await
            .expect("assign failed");

        let (found, roles) = store
            .find_by_his_code_with_roles("HIS001")
            .await
            .expect("query failed")
            .expect("user missing");

        assert_eq!(found.id, user.id);
        let codes: Vec<&str> = roles.iter().map(|r| r.code.as_str()).collect();
        assert!(codes.contains(&"ADMIN"));
        assert!(codes.contains(&"NV"));
    }

    #[tokio::test]
    async fn test_update_rewrites_password_only_when_supplied() {
        let store = setup_store().await;

        let user = store
            .create(sample_user("nva", "HIS001"))
            .await
            .expect("create failed");
        let original_hash = user.password_hash.clone();

        let changes = UserChanges {
            full_name: "Nguyễn Văn B".to_string(),
            his_code_acc: "HIS001".to_string(),
            phone_number: "0987654321".to_string(),
            job_title: "Trưởng phòng".to_string(),
            department_code: Some("CNTT".to_string()),
            password: None,
        };
        let updated = store.update(user.id, changes).await.expect("update failed");
        assert_eq!(updated.password_hash, original_hash);
        assert_eq!(updated.full_name, "Nguyễn Văn B");

        let changes = UserChanges {
            full_name: "Nguyễn Văn B".to_string(),
            his_code_acc: "HIS001".to_string(),
            phone_number: "0987654321".to_string(),
            job_title: "Trưởng phòng".to_string(),
            department_code: Some("CNTT".to_string()),
            password: Some("newpassword".to_string()),
        };
        let updated = store.update(user.id, changes).await.expect("update failed");
        assert_ne!(updated.password_hash, original_hash);
        assert!(verify_password("newpassword", &updated.password_hash));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let store = setup_store().await;

        let user = store
            .create(sample_user("nva", "HIS001"))
            .await
            .expect("create failed");

        let removed = store.delete(user.id).await.expect("delete failed");
        assert_eq!(removed.id, user.id);

        assert!(store.get(user.id).await.expect("get failed").is_none());

        let again = store.delete(user.id).await;
        assert!(matches!(again, Err(StoreError::NotFound)));
    }
}
