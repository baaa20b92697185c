use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    // SQLite only allows AUTOINCREMENT on INTEGER PRIMARY KEY;
                    // the rowid is 64-bit either way
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::UserName).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::HisCodeAcc).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::PhoneNumber).string().not_null().default(""))
                    .col(ColumnDef::new(Users::JobTitle).string().not_null().default(""))
                    .col(ColumnDef::new(Users::DepartmentCode).string().null())
                    .col(ColumnDef::new(Users::CreatedByUserId).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create roles table
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Roles::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Roles::Name).string().not_null())
                    .col(ColumnDef::new(Roles::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Roles::Description).string().null())
                    .col(ColumnDef::new(Roles::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Roles::CreatedAt).big_integer().not_null().default(0))
                    .to_owned(),
            )
            .await?;

        // Create user_roles join table with composite primary key
        manager
            .create_table(
                Table::create()
                    .table(UserRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserRoles::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserRoles::RoleId).integer().not_null())
                    .col(ColumnDef::new(UserRoles::AssignedAt).big_integer().not_null())
                    .col(ColumnDef::new(UserRoles::AssignedByUserId).big_integer().null())
                    .primary_key(
                        Index::create()
                            .col(UserRoles::UserId)
                            .col(UserRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_user_id")
                            .from(UserRoles::Table, UserRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_role_id")
                            .from(UserRoles::Table, UserRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Departments::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Departments::DepartmentCode).string().not_null().unique_key())
                    .col(ColumnDef::new(Departments::FullName).string().not_null())
                    .col(ColumnDef::new(Departments::Description).string().null())
                    .col(ColumnDef::new(Departments::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Departments::CreatedByUserId).big_integer().null())
                    .col(ColumnDef::new(Departments::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create suppliers table
        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Suppliers::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Suppliers::Name).string().not_null())
                    .col(ColumnDef::new(Suppliers::TaxCode).string().not_null().default(""))
                    .col(ColumnDef::new(Suppliers::ContactPerson).string().not_null().default(""))
                    .col(ColumnDef::new(Suppliers::Phone).string().not_null())
                    .col(ColumnDef::new(Suppliers::Email).string().not_null().default(""))
                    .col(ColumnDef::new(Suppliers::Address).string().not_null().default(""))
                    .col(ColumnDef::new(Suppliers::Note).string().not_null().default(""))
                    .col(ColumnDef::new(Suppliers::CreatedByUserId).big_integer().null())
                    .col(ColumnDef::new(Suppliers::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Index for the department referential guard lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_users_department_code")
                    .table(Users::Table)
                    .col(Users::DepartmentCode)
                    .to_owned(),
            )
            .await?;

        // Seed the fixed role set
        let seed = Query::insert()
            .into_table(Roles::Table)
            .columns([Roles::Name, Roles::Code, Roles::Description])
            .values_panic([
                "Quản trị hệ thống".into(),
                "ADMIN".into(),
                "Toàn quyền quản lý hệ thống".into(),
            ])
            .values_panic([
                "Quản lý thiết bị".into(),
                "QLTB".into(),
                "Quản lý hồ sơ thiết bị, cập nhật bảo dưỡng".into(),
            ])
            .values_panic([
                "Trưởng khoa".into(),
                "TK".into(),
                "Duyệt yêu cầu báo hỏng, đề xuất thanh lý".into(),
            ])
            .values_panic([
                "Nhân viên y tế".into(),
                "NV".into(),
                "Sử dụng thiết bị, báo hỏng".into(),
            ])
            .to_owned();

        manager.exec_stmt(seed).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    FullName,
    UserName,
    HisCodeAcc,
    PasswordHash,
    PhoneNumber,
    JobTitle,
    DepartmentCode,
    CreatedByUserId,
    CreatedAt,
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    Name,
    Code,
    Description,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum UserRoles {
    Table,
    UserId,
    RoleId,
    AssignedAt,
    AssignedByUserId,
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    DepartmentCode,
    FullName,
    Description,
    IsActive,
    CreatedByUserId,
    CreatedAt,
}

#[derive(Iden)]
enum Suppliers {
    Table,
    Id,
    Name,
    TaxCode,
    ContactPerson,
    Phone,
    Email,
    Address,
    Note,
    CreatedByUserId,
    CreatedAt,
}
