use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, EntityTrait};

use medequip_backend::types::db::{audit_log, role, user};

// The schema must apply cleanly on SQLite, the database the test suite and
// the default configuration use. AUTOINCREMENT is only valid there on an
// INTEGER PRIMARY KEY, so a type slip in a primary-key column breaks every
// DB-backed test at setup.
#[tokio::test]
async fn test_migrations_apply_on_fresh_sqlite() {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None).await.expect("migrations failed");

    // Tables are queryable and the fixed role set is in place
    assert!(user::Entity::find().all(&db).await.expect("users query failed").is_empty());
    assert!(audit_log::Entity::find().all(&db).await.expect("audit query failed").is_empty());
    assert_eq!(
        role::Entity::find().all(&db).await.expect("roles query failed").len(),
        4
    );
}

#[tokio::test]
async fn test_migrations_roll_back_and_reapply() {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None).await.expect("up failed");
    Migrator::down(&db, None).await.expect("down failed");
    Migrator::up(&db, None).await.expect("re-up failed");

    // Seed data is restored by the fresh apply
    let roles = role::Entity::find().all(&db).await.expect("roles query failed");
    assert_eq!(roles.len(), 4);
}
