use crate::error::MoimError;
use crate::models::{Group, GroupAccount, RoleSet, Snapshot, User};
use crate::storage::{AccountStore, GroupStore, RoleStore};
use log::debug;
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct InMemoryStorage {
    users: HashMap<String, User>,
    groups: HashMap<String, Group>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, MoimError> {
        snapshot.validate()?;
        let mut storage = InMemoryStorage::new();
        for user in snapshot.users {
            storage.users.insert(user.id.clone(), user);
        }
        for record in snapshot.groups {
            let group = Group::from(record);
            storage.groups.insert(group.id.clone(), group);
        }
        debug!(
            "Loaded snapshot with {} users and {} groups",
            storage.users.len(),
            storage.groups.len()
        );
        Ok(storage)
    }

    pub fn from_json(json: &str) -> Result<Self, MoimError> {
        Self::from_snapshot(Snapshot::from_json(json)?)
    }

    fn group_mut(&mut self, group_id: &str) -> Result<&mut Group, MoimError> {
        self.groups
            .get_mut(group_id)
            .ok_or_else(|| MoimError::GroupNotFound(group_id.to_string()))
    }
}

impl RoleStore for InMemoryStorage {
    fn group_exists(&self, group_id: &str) -> bool {
        self.groups.contains_key(group_id)
    }

    fn roles(&self, group_id: &str, user_id: &str) -> Option<RoleSet> {
        self.groups
            .get(group_id)
            .and_then(|g| g.members.get(user_id))
            .cloned()
    }

    fn set_roles(&mut self, group_id: &str, user_id: &str, roles: RoleSet) -> Result<(), MoimError> {
        if !self.users.contains_key(user_id) {
            return Err(MoimError::UserNotFound(user_id.to_string()));
        }
        let group = self.group_mut(group_id)?;
        group.members.insert(user_id.to_string(), roles);
        Ok(())
    }

    fn remove_member(&mut self, group_id: &str, user_id: &str) -> Result<(), MoimError> {
        let group = self.group_mut(group_id)?;
        group
            .members
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| MoimError::UserNotMember(user_id.to_string()))
    }

    fn list_members(&self, group_id: &str) -> Vec<(String, RoleSet)> {
        let mut members: Vec<(String, RoleSet)> = self
            .groups
            .get(group_id)
            .map(|g| g.members.iter().map(|(id, roles)| (id.clone(), roles.clone())).collect())
            .unwrap_or_default();
        members.sort_by(|a, b| a.0.cmp(&b.0));
        members
    }
}

impl AccountStore for InMemoryStorage {
    fn account(&self, group_id: &str) -> Option<GroupAccount> {
        self.groups.get(group_id).map(|g| g.account.clone())
    }

    fn save_account(&mut self, group_id: &str, account: GroupAccount) -> Result<(), MoimError> {
        let group = self.group_mut(group_id)?;
        group.account = account;
        Ok(())
    }
}

impl GroupStore for InMemoryStorage {
    fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).cloned()
    }

    fn get_group(&self, group_id: &str) -> Option<Group> {
        self.groups.get(group_id).cloned()
    }

    fn list_groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = self.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.id.cmp(&b.id));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_SNAPSHOT;
    use crate::models::Role;

    #[test]
    fn loads_bundled_snapshot() {
        let storage = InMemoryStorage::from_json(DEFAULT_SNAPSHOT).unwrap();
        let ids: Vec<String> = storage.list_groups().into_iter().map(|g| g.id).collect();
        assert_eq!(ids, vec!["g1", "g2", "g3", "g4"]);

        let g2 = storage.get_group("g2").unwrap();
        assert_eq!(g2.owner_id(), Some("u4"));
        assert_eq!(storage.get_user("u1").unwrap().name, "Jiwoo Park");
    }

    #[test]
    fn set_and_remove_members() {
        let mut storage = InMemoryStorage::from_json(DEFAULT_SNAPSHOT).unwrap();
        storage
            .set_roles("g3", "u3", RoleSet::single(Role::Manager))
            .unwrap();
        let members: Vec<String> = storage
            .list_members("g3")
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(members, vec!["u1", "u2", "u3"]);

        storage.remove_member("g3", "u3").unwrap();
        assert_eq!(
            storage.remove_member("g3", "u3"),
            Err(MoimError::UserNotMember("u3".to_string()))
        );
        assert_eq!(
            storage.set_roles("g3", "ghost", RoleSet::default()),
            Err(MoimError::UserNotFound("ghost".to_string()))
        );
        assert_eq!(
            storage.set_roles("nope", "u1", RoleSet::default()),
            Err(MoimError::GroupNotFound("nope".to_string()))
        );
        assert!(storage.list_members("nope").is_empty());
    }
}
