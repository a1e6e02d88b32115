use crate::error::MoimError;
use crate::ledger::{AccountLedger, AccountView};
use crate::logger::AuditLogger;
use crate::models::*;
use crate::resolver::{RoleResolver, RoleTable, RoleView, display_color, display_label};
use crate::storage::GroupStore;
use log::{debug, info, warn};
use serde_json::json;

pub struct GroupService<'a> {
    pub storage: &'a mut dyn GroupStore,
    pub audit_logger: &'a mut dyn AuditLogger,
    table: RoleTable,
}

impl<'a> GroupService<'a> {
    pub fn new(storage: &'a mut dyn GroupStore, audit_logger: &'a mut dyn AuditLogger) -> Self {
        Self::with_table(storage, audit_logger, RoleTable::standard())
    }

    pub fn with_table(
        storage: &'a mut dyn GroupStore,
        audit_logger: &'a mut dyn AuditLogger,
        table: RoleTable,
    ) -> Self {
        debug!("Initializing GroupService");
        Self {
            storage,
            audit_logger,
            table,
        }
    }

    pub fn resolver<'r>(&'r self, user_id: &'r str) -> RoleResolver<'r, dyn GroupStore + 'a> {
        RoleResolver::new(&*self.storage, &self.table, user_id)
    }

    // READS

    pub fn my_role(&self, user_id: &str, group_id: &str) -> Result<RoleView, MoimError> {
        debug!("Resolving role of user {} in group {}", user_id, group_id);
        self.resolver(user_id).my_role(group_id)
    }

    pub fn account(&self, user_id: &str, group_id: &str) -> Result<AccountView, MoimError> {
        debug!("Reading account of group {} for user {}", group_id, user_id);
        self.approved_roles(user_id, group_id)?;
        let account = self.load_account(group_id)?;
        Ok(AccountLedger::account_view(&account))
    }

    /// Groups the user belongs to or has asked to join, by group id.
    pub fn my_groups(&self, user_id: &str) -> Vec<GroupSummary> {
        debug!("Listing groups of user {}", user_id);
        self.storage
            .list_groups()
            .iter()
            .filter_map(|group| {
                let roles = group.members.get(user_id)?;
                Some(Self::summary(group, roles))
            })
            .collect()
    }

    pub fn group(&self, user_id: &str, group_id: &str) -> Result<GroupSummary, MoimError> {
        let roles = self.resolver(user_id).try_role_set(group_id)?;
        let group = self
            .storage
            .get_group(group_id)
            .ok_or_else(|| MoimError::GroupNotFound(group_id.to_string()))?;
        Ok(Self::summary(&group, &roles))
    }

    /// Member list of a group. Pending requests are only shown to users who can approve them.
    pub fn members(&self, user_id: &str, group_id: &str) -> Result<Vec<MemberView>, MoimError> {
        self.approved_roles(user_id, group_id)?;
        let sees_requests = self
            .resolver(user_id)
            .resolve_permissions(group_id)
            .allows(Permission::ManageMembers);

        let members = self
            .storage
            .list_members(group_id)
            .into_iter()
            .filter(|(_, roles)| sees_requests || !roles.is_pending())
            .map(|(member_id, roles)| {
                let name = self
                    .storage
                    .get_user(&member_id)
                    .map(|user| user.name)
                    .unwrap_or_else(|| member_id.clone());
                MemberView {
                    user_id: member_id,
                    name,
                    roles: roles.to_vec(),
                    label: display_label(&roles),
                    color: display_color(&roles),
                }
            })
            .collect();
        Ok(members)
    }

    // MEMBERSHIP

    pub fn request_join(&mut self, user_id: &str, group_id: &str) -> Result<(), MoimError> {
        info!("User {} requesting to join group {}", user_id, group_id);
        if self.storage.get_user(user_id).is_none() {
            return Err(MoimError::UserNotFound(user_id.to_string()));
        }
        if !self.storage.group_exists(group_id) {
            return Err(MoimError::GroupNotFound(group_id.to_string()));
        }
        if self.storage.roles(group_id, user_id).is_some() {
            warn!("User {} already in group {}", user_id, group_id);
            return Err(MoimError::AlreadyGroupMember(user_id.to_string()));
        }

        self.storage
            .set_roles(group_id, user_id, RoleSet::single(Role::Pending))?;
        self.audit(group_id, user_id, AuditAction::RequestJoin, json!({}));
        Ok(())
    }

    /// Approves a pending request and charges the entry fee. Returns the fee.
    pub fn approve_join(
        &mut self,
        actor_id: &str,
        group_id: &str,
        target_id: &str,
    ) -> Result<u64, MoimError> {
        info!(
            "User {} approving join of user {} in group {}",
            actor_id, target_id, group_id
        );
        self.authorize(actor_id, group_id, Permission::ManageMembers)?;
        let pending = self
            .storage
            .roles(group_id, target_id)
            .is_some_and(|roles| roles.is_pending());
        if !pending {
            warn!("User {} has no pending request in group {}", target_id, group_id);
            return Err(MoimError::NotPending(target_id.to_string()));
        }

        let mut account = self.load_account(group_id)?;
        let fee = account.admit_member()?;
        self.storage
            .set_roles(group_id, target_id, RoleSet::single(Role::Member))?;
        self.storage.save_account(group_id, account)?;

        self.audit(
            group_id,
            actor_id,
            AuditAction::ApproveJoin,
            json!({ "target_user_id": target_id, "entry_fee": fee }),
        );
        debug!("User {} joined group {} paying {}", target_id, group_id, fee);
        Ok(fee)
    }

    /// Replaces the non-owner roles of an approved member.
    pub fn change_roles(
        &mut self,
        actor_id: &str,
        group_id: &str,
        target_id: &str,
        roles: RoleSet,
    ) -> Result<RoleSet, MoimError> {
        info!(
            "User {} changing roles of user {} in group {} to {}",
            actor_id, target_id, group_id, roles
        );
        self.authorize(actor_id, group_id, Permission::AssignRoles)?;
        if roles.is_owner() {
            warn!("User {} tried to grant ownership through role change", actor_id);
            return Err(MoimError::NotAuthorized(
                actor_id.to_string(),
                "grant ownership without a transfer".to_string(),
            ));
        }
        if roles.is_pending() {
            return Err(MoimError::InvariantViolation(
                "approved members cannot be set back to pending".to_string(),
            ));
        }
        let current = self.target_roles(group_id, target_id)?;
        if current.is_owner() {
            warn!("User {} tried to change the owner's roles", actor_id);
            return Err(MoimError::NotAuthorized(
                actor_id.to_string(),
                "change the owner's roles".to_string(),
            ));
        }

        self.storage.set_roles(group_id, target_id, roles.clone())?;
        debug!("User {} in group {} went from {} to {}", target_id, group_id, current, roles);
        self.audit(
            group_id,
            actor_id,
            AuditAction::ChangeRoles,
            json!({ "target_user_id": target_id, "from": current, "to": roles }),
        );
        Ok(roles)
    }

    pub fn transfer_ownership(
        &mut self,
        actor_id: &str,
        group_id: &str,
        new_owner_id: &str,
    ) -> Result<(), MoimError> {
        info!(
            "Transferring ownership of group {} from user {} to user {}",
            group_id, actor_id, new_owner_id
        );
        let actor_roles = self.resolver(actor_id).try_role_set(group_id)?;
        if !actor_roles.is_owner() {
            warn!(
                "User {} attempted to transfer ownership of group {} without owner role",
                actor_id, group_id
            );
            return Err(MoimError::NotAuthorized(
                actor_id.to_string(),
                "transfer ownership".to_string(),
            ));
        }
        if actor_id == new_owner_id {
            return Err(MoimError::NotAuthorized(
                actor_id.to_string(),
                "transfer ownership to themselves".to_string(),
            ));
        }
        self.target_roles(group_id, new_owner_id)?;

        self.storage
            .set_roles(group_id, new_owner_id, RoleSet::single(Role::Owner))?;
        self.storage
            .set_roles(group_id, actor_id, RoleSet::single(Role::Member))?;

        self.audit(
            group_id,
            actor_id,
            AuditAction::TransferOwnership,
            json!({ "new_owner_id": new_owner_id }),
        );
        debug!("Ownership of group {} transferred", group_id);
        Ok(())
    }

    /// Leaves the group and returns the refund paid out. Pending users just withdraw their request.
    pub fn leave_group(&mut self, user_id: &str, group_id: &str) -> Result<u64, MoimError> {
        info!("User {} leaving group {}", user_id, group_id);
        let roles = self.resolver(user_id).try_role_set(group_id)?;
        if roles.is_owner() {
            warn!("Owner {} attempted to leave group {}", user_id, group_id);
            return Err(MoimError::OwnerCannotLeave);
        }

        let refund = if roles.is_pending() {
            self.storage.remove_member(group_id, user_id)?;
            0
        } else {
            let mut account = self.load_account(group_id)?;
            let refund = account.release_member()?;
            self.storage.remove_member(group_id, user_id)?;
            self.storage.save_account(group_id, account)?;
            refund
        };

        self.audit(
            group_id,
            user_id,
            AuditAction::LeaveGroup,
            json!({ "refund": refund }),
        );
        debug!("User {} left group {} with refund {}", user_id, group_id, refund);
        Ok(refund)
    }

    // ACCOUNT

    pub fn deposit(
        &mut self,
        user_id: &str,
        group_id: &str,
        amount: u64,
    ) -> Result<AccountView, MoimError> {
        info!("User {} depositing {} into group {}", user_id, amount, group_id);
        self.approved_roles(user_id, group_id)?;
        let mut account = self.load_account(group_id)?;
        account.deposit(amount)?;
        self.storage.save_account(group_id, account.clone())?;

        self.audit(
            group_id,
            user_id,
            AuditAction::Deposit,
            json!({ "amount": amount, "balance": account.total_balance() }),
        );
        Ok(AccountLedger::account_view(&account))
    }

    pub fn withdraw(
        &mut self,
        actor_id: &str,
        group_id: &str,
        amount: u64,
    ) -> Result<AccountView, MoimError> {
        info!("User {} withdrawing {} from group {}", actor_id, amount, group_id);
        self.authorize(actor_id, group_id, Permission::Withdraw)?;
        let mut account = self.load_account(group_id)?;
        account.withdraw(amount).inspect_err(|e| {
            warn!("Withdrawal from group {} rejected: {}", group_id, e);
        })?;
        self.storage.save_account(group_id, account.clone())?;

        self.audit(
            group_id,
            actor_id,
            AuditAction::Withdraw,
            json!({ "amount": amount, "balance": account.total_balance() }),
        );
        Ok(AccountLedger::account_view(&account))
    }

    pub fn change_management_type(
        &mut self,
        actor_id: &str,
        group_id: &str,
        management_type: ManagementType,
    ) -> Result<AccountView, MoimError> {
        info!(
            "User {} changing management type of group {} to {}",
            actor_id, group_id, management_type
        );
        self.authorize(actor_id, group_id, Permission::ChangeManagementType)?;
        let mut account = self.load_account(group_id)?;
        let previous = account.management_type();
        account.set_management_type(management_type);
        self.storage.save_account(group_id, account.clone())?;

        self.audit(
            group_id,
            actor_id,
            AuditAction::ChangeManagementType,
            json!({ "from": previous, "to": management_type }),
        );
        Ok(AccountLedger::account_view(&account))
    }

    // HELPERS

    fn authorize(
        &self,
        actor_id: &str,
        group_id: &str,
        permission: Permission,
    ) -> Result<(), MoimError> {
        self.resolver(actor_id)
            .require(group_id, permission)
            .inspect_err(|e| warn!("Rejected user {} in group {}: {}", actor_id, group_id, e))
    }

    /// Roles of a user whose membership has been approved.
    fn approved_roles(&self, user_id: &str, group_id: &str) -> Result<RoleSet, MoimError> {
        self.resolver(user_id)
            .try_approved_role_set(group_id)
            .inspect_err(|_| warn!("User {} tried to act in group {} without membership", user_id, group_id))
    }

    fn target_roles(&self, group_id: &str, target_id: &str) -> Result<RoleSet, MoimError> {
        match self.storage.roles(group_id, target_id) {
            Some(roles) if !roles.is_pending() => Ok(roles),
            _ => {
                warn!("User {} is not an approved member of group {}", target_id, group_id);
                Err(MoimError::UserNotMember(target_id.to_string()))
            }
        }
    }

    fn summary(group: &Group, roles: &RoleSet) -> GroupSummary {
        GroupSummary {
            id: group.id.clone(),
            name: group.name.clone(),
            management_type: group.account.management_type(),
            member_count: group.account.member_count(),
            owner_id: group.owner_id().map(str::to_string),
            my_label: display_label(roles),
        }
    }

    fn load_account(&self, group_id: &str) -> Result<GroupAccount, MoimError> {
        self.storage
            .account(group_id)
            .ok_or_else(|| MoimError::GroupNotFound(group_id.to_string()))
    }

    fn audit(&mut self, group_id: &str, user_id: &str, action: AuditAction, payload: serde_json::Value) {
        self.audit_logger
            .log(AuditLogEntry::new(group_id, user_id, action, payload));
    }
}
