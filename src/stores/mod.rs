pub mod audit_store;
pub mod department_store;
pub mod role_store;
pub mod supplier_store;
pub mod user_store;

pub use audit_store::AuditStore;
pub use department_store::{DepartmentChanges, DepartmentStore, NewDepartment};
pub use role_store::RoleStore;
pub use supplier_store::SupplierStore;
pub use user_store::{NewUser, SeedOutcome, UserChanges, UserStore};
