use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::errors::StoreError;

/// Connect to the database named by `database_url`.
///
/// Does NOT run migrations; call [`migrate_database`] separately.
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection, StoreError> {
    let db = Database::connect(database_url).await?;

    tracing::debug!(url = %database_url, "connected to database");

    Ok(db)
}

/// Run all pending migrations on the provided connection
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), StoreError> {
    Migrator::up(db, None).await?;

    tracing::debug!("database migrations completed");

    Ok(())
}
