use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single capability a role can grant inside a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    ManageGroup,
    ManageDues,
    Withdraw,
    ManageShares,
    ManageMembers,
    DeletePosts,
    DeleteComments,
    FinalizeSchedule,
    ChangeManagementType,
    AssignRoles,
}

impl Permission {
    pub const ALL: [Permission; 10] = [
        Permission::ManageGroup,
        Permission::ManageDues,
        Permission::Withdraw,
        Permission::ManageShares,
        Permission::ManageMembers,
        Permission::DeletePosts,
        Permission::DeleteComments,
        Permission::FinalizeSchedule,
        Permission::ChangeManagementType,
        Permission::AssignRoles,
    ];

    /// Verb phrase used in authorization errors.
    pub fn action(&self) -> &'static str {
        match self {
            Permission::ManageGroup => "manage the group",
            Permission::ManageDues => "manage dues",
            Permission::Withdraw => "withdraw funds",
            Permission::ManageShares => "manage shares",
            Permission::ManageMembers => "manage members",
            Permission::DeletePosts => "delete posts",
            Permission::DeleteComments => "delete comments",
            Permission::FinalizeSchedule => "finalize schedules",
            Permission::ChangeManagementType => "change the management type",
            Permission::AssignRoles => "assign roles",
        }
    }
}

/// Capabilities granted to a user in a group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    pub can_manage_group: bool,
    pub can_manage_dues: bool,
    pub can_withdraw: bool,
    pub can_manage_shares: bool,
    pub can_manage_members: bool,
    pub can_delete_posts: bool,
    pub can_delete_comments: bool,
    pub can_finalize_schedule: bool,
    pub can_change_management_type: bool,
    pub can_assign_roles: bool,
}

impl PermissionSet {
    pub fn none() -> Self {
        PermissionSet::default()
    }

    pub fn all() -> Self {
        PermissionSet::from_permissions(Permission::ALL)
    }

    pub fn from_permissions<I: IntoIterator<Item = Permission>>(permissions: I) -> Self {
        let mut set = PermissionSet::none();
        for permission in permissions {
            *set.flag_mut(permission) = true;
        }
        set
    }

    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::ManageGroup => self.can_manage_group,
            Permission::ManageDues => self.can_manage_dues,
            Permission::Withdraw => self.can_withdraw,
            Permission::ManageShares => self.can_manage_shares,
            Permission::ManageMembers => self.can_manage_members,
            Permission::DeletePosts => self.can_delete_posts,
            Permission::DeleteComments => self.can_delete_comments,
            Permission::FinalizeSchedule => self.can_finalize_schedule,
            Permission::ChangeManagementType => self.can_change_management_type,
            Permission::AssignRoles => self.can_assign_roles,
        }
    }

    fn flag_mut(&mut self, permission: Permission) -> &mut bool {
        match permission {
            Permission::ManageGroup => &mut self.can_manage_group,
            Permission::ManageDues => &mut self.can_manage_dues,
            Permission::Withdraw => &mut self.can_withdraw,
            Permission::ManageShares => &mut self.can_manage_shares,
            Permission::ManageMembers => &mut self.can_manage_members,
            Permission::DeletePosts => &mut self.can_delete_posts,
            Permission::DeleteComments => &mut self.can_delete_comments,
            Permission::FinalizeSchedule => &mut self.can_finalize_schedule,
            Permission::ChangeManagementType => &mut self.can_change_management_type,
            Permission::AssignRoles => &mut self.can_assign_roles,
        }
    }

    /// Flag-wise OR. Never revokes a grant from either side.
    pub fn union(self, other: PermissionSet) -> PermissionSet {
        PermissionSet::from_permissions(
            Permission::ALL
                .into_iter()
                .filter(|&p| self.allows(p) || other.allows(p)),
        )
    }

    pub fn is_superset_of(&self, other: &PermissionSet) -> bool {
        Permission::ALL
            .into_iter()
            .all(|p| !other.allows(p) || self.allows(p))
    }

    pub fn is_complete(&self) -> bool {
        *self == PermissionSet::all()
    }

    pub fn is_empty(&self) -> bool {
        *self == PermissionSet::none()
    }
}
