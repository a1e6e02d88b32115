use crate::error::MoimError;
use crate::models::{Group, GroupAccount, RoleSet, User};

/// Role assignments keyed by group and user.
pub trait RoleStore {
    fn group_exists(&self, group_id: &str) -> bool;
    fn roles(&self, group_id: &str, user_id: &str) -> Option<RoleSet>;
    fn set_roles(&mut self, group_id: &str, user_id: &str, roles: RoleSet) -> Result<(), MoimError>;
    fn remove_member(&mut self, group_id: &str, user_id: &str) -> Result<(), MoimError>;
    fn list_members(&self, group_id: &str) -> Vec<(String, RoleSet)>;
}

/// Group dues accounts, one per group.
pub trait AccountStore {
    fn account(&self, group_id: &str) -> Option<GroupAccount>;
    fn save_account(&mut self, group_id: &str, account: GroupAccount) -> Result<(), MoimError>;
}

/// Everything the group service reads and writes.
pub trait GroupStore: RoleStore + AccountStore {
    fn get_user(&self, user_id: &str) -> Option<User>;
    fn get_group(&self, group_id: &str) -> Option<Group>;
    fn list_groups(&self) -> Vec<Group>;
}

pub mod in_memory;
