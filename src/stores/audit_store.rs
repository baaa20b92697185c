use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, Set};

use crate::audit::entry::AuditEntry;
use crate::errors::StoreError;
use crate::types::db::audit_log;

/// Repository for the append-only audit trail
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append an audit entry. There is no update or delete counterpart.
    pub async fn write_entry(&self, entry: AuditEntry) -> Result<(), StoreError> {
        let model = audit_log::ActiveModel {
            id: NotSet,
            user_id: Set(entry.user_id),
            action: Set(entry.action.to_string()),
            table_name: Set(entry.table_name),
            record_id: Set(entry.record_id),
            old_data: Set(entry.old_data.map(|v| v.to_string())),
            new_data: Set(entry.new_data.map(|v| v.to_string())),
            ip_address: Set(entry.ip_address),
            user_agent: Set(entry.user_agent),
            timestamp: Set(Utc::now().to_rfc3339()),
            status: Set(if entry.success { 1 } else { 0 }),
        };

        model.insert(&self.db).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::AuditAction;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, EntityTrait};
    use serde_json::json;

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    #[tokio::test]
    async fn test_write_entry_persists_snapshots_and_outcome() {
        let db = setup_test_db().await;
        let store = AuditStore::new(db.clone());

        let entry = AuditEntry::new(AuditAction::Update, "departments")
            .actor(Some(7))
            .record_id(3_i16)
            .old_data(json!({"full_name": "Khoa Nội"}))
            .new_data(json!({"full_name": "Khoa Nội Tổng Hợp"}))
            .source(Some("10.0.0.9".to_string()), Some("curl/8".to_string()));

        store.write_entry(entry).await.expect("write failed");

        let rows = audit_log::Entity::find()
            .all(&db)
            .await
            .expect("query failed");
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.user_id, Some(7));
        assert_eq!(row.action, "UPDATE");
        assert_eq!(row.table_name, "departments");
        assert_eq!(row.record_id.as_deref(), Some("3"));
        assert_eq!(row.status, 1);
        assert!(row.old_data.as_deref().unwrap().contains("Khoa Nội"));
    }

    #[tokio::test]
    async fn test_failure_entries_allow_null_actor() {
        let db = setup_test_db().await;
        let store = AuditStore::new(db.clone());

        let entry = AuditEntry::new(AuditAction::Login, "users").failed();
        store.write_entry(entry).await.expect("write failed");

        let row = audit_log::Entity::find()
            .one(&db)
            .await
            .expect("query failed")
            .expect("row missing");
        assert_eq!(row.user_id, None);
        assert_eq!(row.status, 0);
    }
}
