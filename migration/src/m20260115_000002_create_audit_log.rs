use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only audit trail. No update/delete path is ever created
        // for this table.
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    // SQLite only allows AUTOINCREMENT on INTEGER PRIMARY KEY
                    .col(ColumnDef::new(AuditLogs::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(AuditLogs::UserId).big_integer().null())
                    .col(ColumnDef::new(AuditLogs::Action).string().not_null())
                    .col(ColumnDef::new(AuditLogs::TableName).string().not_null())
                    .col(ColumnDef::new(AuditLogs::RecordId).string().null())
                    .col(ColumnDef::new(AuditLogs::OldData).string().null())
                    .col(ColumnDef::new(AuditLogs::NewData).string().null())
                    .col(ColumnDef::new(AuditLogs::IpAddress).string().null())
                    .col(ColumnDef::new(AuditLogs::UserAgent).string().null())
                    .col(ColumnDef::new(AuditLogs::Timestamp).string().not_null())
                    .col(ColumnDef::new(AuditLogs::Status).integer().not_null().default(1))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_table_name")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::TableName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_user_id")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AuditLogs {
    Table,
    Id,
    UserId,
    Action,
    TableName,
    RecordId,
    OldData,
    NewData,
    IpAddress,
    UserAgent,
    Timestamp,
    Status,
}
