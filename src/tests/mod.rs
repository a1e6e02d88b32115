mod role_tests;

use crate::models::{Role, RoleSet};
use crate::storage::in_memory::InMemoryStorage;
use crate::DEFAULT_SNAPSHOT;

pub fn fixture_storage() -> InMemoryStorage {
    InMemoryStorage::from_json(DEFAULT_SNAPSHOT).expect("bundled snapshot is valid")
}

pub fn roles(list: &[Role]) -> RoleSet {
    RoleSet::new(list.iter().copied()).expect("valid role set")
}

/// Every subset of the approved roles, including the empty set.
pub fn approved_role_subsets() -> Vec<Vec<Role>> {
    let base = [Role::Owner, Role::Treasurer, Role::Manager, Role::Member];
    (0u8..16)
        .map(|mask| {
            base.iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u8 << *i) != 0)
                .map(|(_, role)| *role)
                .collect()
        })
        .collect()
}
