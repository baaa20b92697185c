use sea_orm::DbErr;

/// Failures raised by the store layer before they are translated into HTTP
/// responses at the API boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Record not found")]
    NotFound,

    #[error("User name '{0}' already exists")]
    DuplicateUserName(String),

    #[error("HIS account code '{0}' already exists")]
    DuplicateHisCode(String),

    #[error("Department code '{0}' already exists")]
    DuplicateDepartmentCode(String),

    #[error("Role is already assigned to this user")]
    DuplicateRoleAssignment,

    #[error("Role with code '{0}' not found")]
    RoleNotFound(String),

    #[error("Department '{0}' still has users attached")]
    DepartmentInUse(String),
}
