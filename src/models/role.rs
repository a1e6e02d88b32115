use crate::error::MoimError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;

/// A role a user can hold in a group.
///
/// Declaration order doubles as display priority: `Ord` sorts owner first.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Treasurer,
    Manager,
    Member,
    Pending,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Treasurer => "Treasurer",
            Role::Manager => "Manager",
            Role::Member => "Member",
            Role::Pending => "Pending",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Owner => "owner",
            Role::Treasurer => "treasurer",
            Role::Manager => "manager",
            Role::Member => "member",
            Role::Pending => "pending",
        };
        write!(f, "{}", s)
    }
}

/// The roles one user holds in one group.
///
/// Never empty: an empty input becomes `{member}`. `pending` is always alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub fn new<I: IntoIterator<Item = Role>>(roles: I) -> Result<Self, MoimError> {
        let roles: BTreeSet<Role> = roles.into_iter().collect();
        if roles.is_empty() {
            return Ok(Self::default());
        }
        if roles.contains(&Role::Pending) && roles.len() > 1 {
            return Err(MoimError::InvariantViolation(
                "pending cannot be combined with other roles".to_string(),
            ));
        }
        Ok(RoleSet(roles))
    }

    pub fn single(role: Role) -> Self {
        RoleSet(BTreeSet::from([role]))
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Roles in priority order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn is_owner(&self) -> bool {
        self.contains(Role::Owner)
    }

    pub fn is_pending(&self) -> bool {
        self.contains(Role::Pending)
    }

    pub fn to_vec(&self) -> Vec<Role> {
        self.iter().collect()
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        RoleSet::single(Role::Member)
    }
}

impl std::fmt::Display for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.iter().map(|role| role.to_string()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

impl TryFrom<Vec<Role>> for RoleSet {
    type Error = MoimError;

    fn try_from(roles: Vec<Role>) -> Result<Self, Self::Error> {
        RoleSet::new(roles)
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.0.into_iter().collect()
    }
}

/// Badge style token shown next to a user's role label.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Gold,
    Violet,
    Emerald,
    Blue,
    Gray,
    Slate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_defaults_to_member() {
        let set = RoleSet::new(Vec::new()).unwrap();
        assert_eq!(set, RoleSet::single(Role::Member));
    }

    #[test]
    fn pending_must_stand_alone() {
        let result = RoleSet::new([Role::Pending, Role::Member]);
        assert!(matches!(result, Err(MoimError::InvariantViolation(_))));
        assert!(RoleSet::new([Role::Pending]).unwrap().is_pending());
    }

    #[test]
    fn iterates_in_priority_order() {
        let set = RoleSet::new([Role::Member, Role::Manager, Role::Owner]).unwrap();
        assert_eq!(set.to_vec(), vec![Role::Owner, Role::Manager, Role::Member]);
    }

    #[test]
    fn displays_lowercase_names() {
        let set = RoleSet::new([Role::Manager, Role::Treasurer]).unwrap();
        assert_eq!(set.to_string(), "{treasurer, manager}");
        assert_eq!(Role::Pending.to_string(), "pending");
    }

    #[test]
    fn deserializes_from_lowercase_list() {
        let set: RoleSet = serde_json::from_str(r#"["manager","treasurer"]"#).unwrap();
        assert_eq!(set.to_vec(), vec![Role::Treasurer, Role::Manager]);

        let bad: Result<RoleSet, _> = serde_json::from_str(r#"["pending","owner"]"#);
        assert!(bad.is_err());
    }
}
