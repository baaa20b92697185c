use std::fmt;

/// Action kinds recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    Insert,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One record of a sensitive action, built up before being written.
///
/// Entries are append-only once stored; nothing in the system updates or
/// deletes them.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Acting user; None for system-initiated or pre-authentication actions
    pub user_id: Option<i64>,
    pub action: AuditAction,
    pub table_name: String,
    pub record_id: Option<String>,
    pub old_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub success: bool,
}

impl AuditEntry {
    /// Start a new entry for an action on the given table. Defaults to a
    /// successful outcome with no actor.
    pub fn new(action: AuditAction, table_name: impl Into<String>) -> Self {
        Self {
            user_id: None,
            action,
            table_name: table_name.into(),
            record_id: None,
            old_data: None,
            new_data: None,
            ip_address: None,
            user_agent: None,
            success: true,
        }
    }

    pub fn actor(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn record_id(mut self, id: impl ToString) -> Self {
        self.record_id = Some(id.to_string());
        self
    }

    pub fn old_data(mut self, snapshot: serde_json::Value) -> Self {
        self.old_data = Some(snapshot);
        self
    }

    pub fn new_data(mut self, snapshot: serde_json::Value) -> Self {
        self.new_data = Some(snapshot);
        self
    }

    /// Attach the request origin (client IP and agent string)
    pub fn source(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }

    pub fn failed(mut self) -> Self {
        self.success = false;
        self
    }
}
