pub mod entry;
pub mod recorder;

pub use entry::{AuditAction, AuditEntry};
pub use recorder::AuditRecorder;
