use crate::error::MoimError;
use crate::models::{BadgeColor, Permission, PermissionSet, Role, RoleSet};
use crate::storage::RoleStore;
use log::debug;
use serde::Serialize;
use utoipa::ToSchema;

/// Capability rows for every role.
///
/// The owner row must grant everything and the pending row nothing; any other
/// table is rejected at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleTable {
    owner: PermissionSet,
    treasurer: PermissionSet,
    manager: PermissionSet,
    member: PermissionSet,
    pending: PermissionSet,
}

impl RoleTable {
    pub fn new(
        owner: PermissionSet,
        treasurer: PermissionSet,
        manager: PermissionSet,
        member: PermissionSet,
        pending: PermissionSet,
    ) -> Result<Self, MoimError> {
        if !owner.is_complete() {
            return Err(MoimError::InvariantViolation(
                "owner row must grant every permission".to_string(),
            ));
        }
        if !pending.is_empty() {
            return Err(MoimError::InvariantViolation(
                "pending row must not grant any permission".to_string(),
            ));
        }
        Ok(RoleTable {
            owner,
            treasurer,
            manager,
            member,
            pending,
        })
    }

    pub fn standard() -> Self {
        RoleTable {
            owner: PermissionSet::all(),
            treasurer: PermissionSet::from_permissions([
                Permission::ManageDues,
                Permission::Withdraw,
                Permission::ManageShares,
            ]),
            manager: PermissionSet::from_permissions([
                Permission::ManageMembers,
                Permission::DeletePosts,
                Permission::DeleteComments,
                Permission::FinalizeSchedule,
            ]),
            member: PermissionSet::none(),
            pending: PermissionSet::none(),
        }
    }

    pub fn row(&self, role: Role) -> PermissionSet {
        match role {
            Role::Owner => self.owner,
            Role::Treasurer => self.treasurer,
            Role::Manager => self.manager,
            Role::Member => self.member,
            Role::Pending => self.pending,
        }
    }

    /// OR of the rows of every role in `roles`.
    pub fn permissions_for(&self, roles: &RoleSet) -> PermissionSet {
        if roles.is_owner() {
            return PermissionSet::all();
        }
        roles
            .iter()
            .fold(PermissionSet::none(), |acc, role| acc.union(self.row(role)))
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        RoleTable::standard()
    }
}

/// Highest-priority role of the set; `pending` only when nothing else is held.
pub fn primary_role(roles: &RoleSet) -> Role {
    roles
        .iter()
        .find(|role| *role != Role::Pending)
        .unwrap_or(Role::Pending)
}

/// True only for exactly `{treasurer, manager}`.
pub fn is_compound(roles: &RoleSet) -> bool {
    roles.to_vec() == [Role::Treasurer, Role::Manager]
}

pub fn display_label(roles: &RoleSet) -> String {
    if roles.is_owner() {
        return Role::Owner.label().to_string();
    }
    if is_compound(roles) {
        return format!("{}+{}", Role::Treasurer.label(), Role::Manager.label());
    }
    primary_role(roles).label().to_string()
}

pub fn display_color(roles: &RoleSet) -> BadgeColor {
    if is_compound(roles) {
        return BadgeColor::Violet;
    }
    match primary_role(roles) {
        Role::Owner => BadgeColor::Gold,
        Role::Treasurer => BadgeColor::Emerald,
        Role::Manager => BadgeColor::Blue,
        Role::Member => BadgeColor::Gray,
        Role::Pending => BadgeColor::Slate,
    }
}

/// A user's standing in a group as shown to that user.
#[derive(Clone, Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoleView {
    pub primary_role: Role,
    pub roles: Vec<Role>,
    pub label: String,
    pub color: BadgeColor,
    pub permissions: PermissionSet,
}

/// Resolves the roles and permissions one user holds across groups.
pub struct RoleResolver<'a, S: RoleStore + ?Sized> {
    store: &'a S,
    table: &'a RoleTable,
    user_id: &'a str,
}

impl<'a, S: RoleStore + ?Sized> RoleResolver<'a, S> {
    pub fn new(store: &'a S, table: &'a RoleTable, user_id: &'a str) -> Self {
        Self {
            store,
            table,
            user_id,
        }
    }

    /// Roles held in the group, `{member}` when the group or user is unknown.
    pub fn role_set(&self, group_id: &str) -> RoleSet {
        self.store
            .roles(group_id, self.user_id)
            .unwrap_or_default()
    }

    pub fn try_role_set(&self, group_id: &str) -> Result<RoleSet, MoimError> {
        if !self.store.group_exists(group_id) {
            return Err(MoimError::GroupNotFound(group_id.to_string()));
        }
        self.store
            .roles(group_id, self.user_id)
            .ok_or_else(|| MoimError::UserNotMember(self.user_id.to_string()))
    }

    /// Like `try_role_set`, but a pending request does not count as membership.
    pub fn try_approved_role_set(&self, group_id: &str) -> Result<RoleSet, MoimError> {
        let roles = self.try_role_set(group_id)?;
        if roles.is_pending() {
            return Err(MoimError::UserNotMember(self.user_id.to_string()));
        }
        Ok(roles)
    }

    pub fn resolve_primary_role(&self, group_id: &str) -> Role {
        primary_role(&self.role_set(group_id))
    }

    pub fn resolve_permissions(&self, group_id: &str) -> PermissionSet {
        let permissions = self.table.permissions_for(&self.role_set(group_id));
        debug!(
            "Resolved permissions for user {} in group {}: {:?}",
            self.user_id, group_id, permissions
        );
        permissions
    }

    pub fn display_label(&self, group_id: &str) -> String {
        display_label(&self.role_set(group_id))
    }

    pub fn display_color(&self, group_id: &str) -> BadgeColor {
        display_color(&self.role_set(group_id))
    }

    /// Strict counterpart of the lookups above for a known membership.
    pub fn my_role(&self, group_id: &str) -> Result<RoleView, MoimError> {
        let roles = self.try_role_set(group_id)?;
        Ok(RoleView {
            primary_role: primary_role(&roles),
            roles: roles.to_vec(),
            label: display_label(&roles),
            color: display_color(&roles),
            permissions: self.table.permissions_for(&roles),
        })
    }

    /// Fails with `NotAuthorized` unless the user holds `permission` in the group.
    pub fn require(&self, group_id: &str, permission: Permission) -> Result<(), MoimError> {
        let roles = self.try_role_set(group_id)?;
        if self.table.permissions_for(&roles).allows(permission) {
            Ok(())
        } else {
            Err(MoimError::NotAuthorized(
                self.user_id.to_string(),
                permission.action().to_string(),
            ))
        }
    }
}
