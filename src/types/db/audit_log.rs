use sea_orm::entity::prelude::*;

/// SeaORM entity for the append-only audit_logs table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Acting user; None for system-initiated or pre-authentication actions
    pub user_id: Option<i64>,
    pub action: String,
    pub table_name: String,
    pub record_id: Option<String>,
    pub old_data: Option<String>,
    pub new_data: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: String,
    /// 1 = success, 0 = failure
    pub status: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
