use crate::logger::AuditLogger;
use crate::models::AuditLogEntry;
use log::info;

#[derive(Clone, Debug, Default)]
pub struct InMemoryAuditLogger {
    logs: Vec<AuditLogEntry>,
}

impl InMemoryAuditLogger {
    pub fn new() -> Self {
        InMemoryAuditLogger::default()
    }
}

impl AuditLogger for InMemoryAuditLogger {
    fn log(&mut self, entry: AuditLogEntry) {
        info!(
            "audit: {:?} by {} in group {}",
            entry.action, entry.user_id, entry.group_id
        );
        self.logs.push(entry);
    }

    fn entries(&self) -> Vec<AuditLogEntry> {
        self.logs.clone()
    }
}
