pub mod account;
pub mod audit;
pub mod group;
pub mod permission;
pub mod role;
pub mod user;

pub use account::{AccountRecord, GroupAccount, ManagementType};
pub use audit::{AuditAction, AuditLogEntry};
pub use group::{Group, GroupRecord, GroupSummary, MemberRecord, MemberView, Snapshot};
pub use permission::{Permission, PermissionSet};
pub use role::{BadgeColor, Role, RoleSet};
pub use user::User;
