use super::account::{GroupAccount, ManagementType};
use super::role::{BadgeColor, Role, RoleSet};
use super::user::User;
use crate::error::MoimError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

#[derive(Clone, Debug)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub account: GroupAccount,
    pub members: HashMap<String, RoleSet>,
}

impl Group {
    pub fn owner_id(&self) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, roles)| roles.is_owner())
            .map(|(user_id, _)| user_id.as_str())
    }
}

/// A group as listed to one of its members.
#[derive(Clone, Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
    pub management_type: ManagementType,
    pub member_count: u32,
    pub owner_id: Option<String>,
    pub my_label: String,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub user_id: String,
    pub name: String,
    pub roles: Vec<Role>,
    pub label: String,
    pub color: BadgeColor,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub user_id: String,
    pub roles: RoleSet,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: String,
    pub name: String,
    pub account: GroupAccount,
    #[serde(default)]
    pub members: Vec<MemberRecord>,
}

/// Seed data for the in-memory store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, MoimError> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|e| MoimError::InvalidSnapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks cross-record references; per-record invariants are enforced on parse.
    pub fn validate(&self) -> Result<(), MoimError> {
        let mut user_ids = HashSet::new();
        for user in &self.users {
            if !user_ids.insert(user.id.as_str()) {
                return Err(MoimError::InvalidSnapshot(format!("duplicate user {}", user.id)));
            }
        }

        let mut group_ids = HashSet::new();
        for group in &self.groups {
            if !group_ids.insert(group.id.as_str()) {
                return Err(MoimError::InvalidSnapshot(format!("duplicate group {}", group.id)));
            }

            let mut seen = HashSet::new();
            let mut owners = 0usize;
            let mut approved = 0u32;
            for member in &group.members {
                if !user_ids.contains(member.user_id.as_str()) {
                    return Err(MoimError::InvalidSnapshot(format!(
                        "group {} references unknown user {}",
                        group.id, member.user_id
                    )));
                }
                if !seen.insert(member.user_id.as_str()) {
                    return Err(MoimError::InvalidSnapshot(format!(
                        "user {} listed twice in group {}",
                        member.user_id, group.id
                    )));
                }
                if member.roles.is_owner() {
                    owners += 1;
                }
                if !member.roles.is_pending() {
                    approved += 1;
                }
            }
            if group.account.member_count() < approved {
                return Err(MoimError::InvalidSnapshot(format!(
                    "group {} counts {} members but lists {} approved",
                    group.id,
                    group.account.member_count(),
                    approved
                )));
            }
            if owners > 1 {
                return Err(MoimError::InvalidSnapshot(format!(
                    "group {} has {} owners",
                    group.id, owners
                )));
            }
        }
        Ok(())
    }
}

impl From<GroupRecord> for Group {
    fn from(record: GroupRecord) -> Self {
        Group {
            id: record.id,
            name: record.name,
            account: record.account,
            members: record
                .members
                .into_iter()
                .map(|m| (m.user_id, m.roles))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_member() {
        let json = r#"{
            "users": [{"id": "u1", "name": "Ana"}],
            "groups": [{
                "id": "g1", "name": "Book Club",
                "account": {"managementType": "fair", "totalBalance": 100, "memberCount": 2},
                "members": [{"userId": "u2", "roles": ["member"]}]
            }]
        }"#;
        let result = Snapshot::from_json(json);
        assert!(matches!(result, Err(MoimError::InvalidSnapshot(_))));
    }

    #[test]
    fn rejects_two_owners() {
        let json = r#"{
            "users": [{"id": "u1", "name": "Ana"}, {"id": "u2", "name": "Ben"}],
            "groups": [{
                "id": "g1", "name": "Book Club",
                "account": {"managementType": "fair", "totalBalance": 100, "memberCount": 2},
                "members": [
                    {"userId": "u1", "roles": ["owner"]},
                    {"userId": "u2", "roles": ["owner", "treasurer"]}
                ]
            }]
        }"#;
        assert!(Snapshot::from_json(json).is_err());
    }

    #[test]
    fn rejects_member_count_below_listed_members() {
        let json = r#"{
            "users": [{"id": "u1", "name": "Ana"}, {"id": "u2", "name": "Ben"}, {"id": "u3", "name": "Cho"}],
            "groups": [{
                "id": "g1", "name": "Book Club",
                "account": {"managementType": "fair", "totalBalance": 900, "memberCount": 1},
                "members": [
                    {"userId": "u1", "roles": ["owner"]},
                    {"userId": "u2", "roles": ["member"]},
                    {"userId": "u3", "roles": ["member"]}
                ]
            }]
        }"#;
        assert!(matches!(
            Snapshot::from_json(json),
            Err(MoimError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn pending_requests_do_not_count_as_members() {
        let json = r#"{
            "users": [{"id": "u1", "name": "Ana"}, {"id": "u2", "name": "Ben"}],
            "groups": [{
                "id": "g1", "name": "Book Club",
                "account": {"managementType": "fair", "totalBalance": 900, "memberCount": 1},
                "members": [
                    {"userId": "u1", "roles": ["owner"]},
                    {"userId": "u2", "roles": ["pending"]}
                ]
            }]
        }"#;
        assert!(Snapshot::from_json(json).is_ok());
    }

    #[test]
    fn rejects_zero_member_account() {
        let json = r#"{
            "groups": [{
                "id": "g1", "name": "Empty",
                "account": {"managementType": "operating", "totalBalance": 0, "memberCount": 0}
            }]
        }"#;
        assert!(matches!(
            Snapshot::from_json(json),
            Err(MoimError::InvalidSnapshot(_))
        ));
    }
}
