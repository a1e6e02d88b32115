use utoipa::OpenApi;

use crate::{
    api::models::{
        AmountRequest, ApproveJoinRequest, ApproveJoinResponse, ChangeManagementTypeRequest,
        ChangeRolesRequest, ChangeRolesResponse, ErrorResponse, LeaveGroupResponse, LoginRequest,
        LoginResponse, TransferOwnershipRequest,
    },
    ledger::AccountView,
    models::{
        AuditAction, AuditLogEntry, BadgeColor, GroupSummary, ManagementType, MemberView,
        PermissionSet, Role,
    },
    resolver::RoleView,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::login,
        super::handlers::list_my_groups,
        super::handlers::get_group,
        super::handlers::list_members,
        super::handlers::get_my_role,
        super::handlers::get_account,
        super::handlers::request_join,
        super::handlers::approve_join,
        super::handlers::change_roles,
        super::handlers::transfer_ownership,
        super::handlers::deposit,
        super::handlers::withdraw,
        super::handlers::leave_group,
        super::handlers::change_management_type,
        super::handlers::get_group_audits
    ),
    components(schemas(
        LoginRequest,
        LoginResponse,
        ApproveJoinRequest,
        ApproveJoinResponse,
        ChangeRolesRequest,
        ChangeRolesResponse,
        TransferOwnershipRequest,
        AmountRequest,
        ChangeManagementTypeRequest,
        LeaveGroupResponse,
        ErrorResponse,
        RoleView,
        AccountView,
        GroupSummary,
        MemberView,
        AuditLogEntry,
        AuditAction,
        Role,
        BadgeColor,
        ManagementType,
        PermissionSet
    )),
    info(
        title = "Moim API",
        description = "Group roles, permissions and dues accounts",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
