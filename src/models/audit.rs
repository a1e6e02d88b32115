use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    RequestJoin,
    ApproveJoin,
    ChangeRoles,
    TransferOwnership,
    Deposit,
    Withdraw,
    LeaveGroup,
    ChangeManagementType,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct AuditLogEntry {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub group_id: String,
    pub user_id: String,
    pub action: AuditAction,
    #[schema(value_type = Object)]
    pub payload: Value,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(group_id: &str, user_id: &str, action: AuditAction, payload: Value) -> Self {
        AuditLogEntry {
            id: Uuid::new_v4(),
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
            action,
            payload,
            created_at: Utc::now(),
        }
    }
}
