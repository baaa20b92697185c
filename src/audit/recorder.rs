use std::sync::Arc;

use crate::audit::entry::AuditEntry;
use crate::stores::AuditStore;

/// Writes audit entries through the audit store.
///
/// A failed audit write is logged but does not fail or roll back the
/// mutation it describes; the admin tool favors availability here.
pub struct AuditRecorder {
    audit_store: Arc<AuditStore>,
}

impl AuditRecorder {
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    pub async fn record(&self, entry: AuditEntry) {
        let action = entry.action;
        let table = entry.table_name.clone();

        if let Err(e) = self.audit_store.write_entry(entry).await {
            tracing::error!(
                error = %e,
                action = %action,
                table = %table,
                "failed to write audit entry"
            );
        }
    }
}
