use crate::models::AuditLogEntry;

pub trait AuditLogger {
    fn log(&mut self, entry: AuditLogEntry);
    fn entries(&self) -> Vec<AuditLogEntry>;

    fn entries_for_group(&self, group_id: &str) -> Vec<AuditLogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.group_id == group_id)
            .collect()
    }
}

pub mod in_memory;
