pub mod audit_log;
pub mod department;
pub mod role;
pub mod supplier;
pub mod user;
pub mod user_role;
