use super::{approved_role_subsets, fixture_storage, roles};
use crate::error::MoimError;
use crate::models::{BadgeColor, Permission, PermissionSet, Role, RoleSet};
use crate::resolver::{RoleResolver, RoleTable, display_color, display_label, primary_role};

#[test]
fn test_permissions_are_monotonic_under_role_union() {
    let _ = env_logger::try_init();
    let table = RoleTable::standard();
    let subsets = approved_role_subsets();

    for subset in &subsets {
        let set = roles(subset);
        let granted = table.permissions_for(&set);
        for role in subset {
            assert!(
                granted.is_superset_of(&table.row(*role)),
                "{:?} lost permissions of {:?}",
                subset,
                role
            );
        }
        for other in &subsets {
            if other.iter().all(|r| subset.contains(r)) {
                let smaller = table.permissions_for(&roles(other));
                assert!(granted.is_superset_of(&smaller), "{:?} ⊉ {:?}", subset, other);
            }
        }
    }
}

#[test]
fn test_every_role_pair_only_adds_permissions() {
    let table = RoleTable::standard();
    let approved = [Role::Owner, Role::Treasurer, Role::Manager, Role::Member];
    for a in approved {
        for b in approved {
            let pair = table.permissions_for(&roles(&[a, b]));
            assert_eq!(pair, table.row(a).union(table.row(b)).union(pair));
            assert!(pair.is_superset_of(&table.row(a)));
            assert!(pair.is_superset_of(&table.row(b)));
        }
    }
}

#[test]
fn test_owner_is_permission_complete_with_any_companions() {
    let table = RoleTable::standard();
    for subset in approved_role_subsets() {
        if subset.contains(&Role::Owner) {
            assert_eq!(table.permissions_for(&roles(&subset)), PermissionSet::all());
        }
    }
}

#[test]
fn test_pending_and_member_grant_nothing() {
    let table = RoleTable::standard();
    assert!(table.permissions_for(&RoleSet::single(Role::Pending)).is_empty());
    assert!(table.permissions_for(&RoleSet::single(Role::Member)).is_empty());
}

#[test]
fn test_staff_rows() {
    let table = RoleTable::standard();
    let treasurer = table.row(Role::Treasurer);
    assert!(treasurer.allows(Permission::Withdraw));
    assert!(treasurer.allows(Permission::ManageDues));
    assert!(!treasurer.allows(Permission::ManageMembers));

    let manager = table.row(Role::Manager);
    assert!(manager.allows(Permission::ManageMembers));
    assert!(manager.allows(Permission::FinalizeSchedule));
    assert!(!manager.allows(Permission::Withdraw));
    assert!(!manager.allows(Permission::AssignRoles));
}

#[test]
fn test_role_table_rejects_incomplete_owner_row() {
    let mut owner = PermissionSet::all();
    owner.can_assign_roles = false;
    let result = RoleTable::new(
        owner,
        PermissionSet::none(),
        PermissionSet::none(),
        PermissionSet::none(),
        PermissionSet::none(),
    );
    assert!(matches!(result, Err(MoimError::InvariantViolation(_))));
}

#[test]
fn test_role_table_rejects_granting_pending_row() {
    let result = RoleTable::new(
        PermissionSet::all(),
        PermissionSet::none(),
        PermissionSet::none(),
        PermissionSet::none(),
        PermissionSet::from_permissions([Permission::DeleteComments]),
    );
    assert!(matches!(result, Err(MoimError::InvariantViolation(_))));
}

#[test]
fn test_standard_table_passes_validation() {
    let table = RoleTable::standard();
    let rebuilt = RoleTable::new(
        table.row(Role::Owner),
        table.row(Role::Treasurer),
        table.row(Role::Manager),
        table.row(Role::Member),
        table.row(Role::Pending),
    );
    assert_eq!(rebuilt, Ok(table));
}

#[test]
fn test_primary_role_follows_priority_for_every_subset() {
    let priority = [Role::Owner, Role::Treasurer, Role::Manager, Role::Member];
    for subset in approved_role_subsets() {
        let expected = priority
            .iter()
            .copied()
            .find(|r| subset.contains(r))
            .unwrap_or(Role::Member);
        assert_eq!(primary_role(&roles(&subset)), expected, "subset {:?}", subset);
    }
    assert_eq!(primary_role(&RoleSet::single(Role::Pending)), Role::Pending);
}

#[test]
fn test_compound_label_only_for_treasurer_and_manager() {
    assert_eq!(
        display_label(&roles(&[Role::Manager, Role::Treasurer])),
        "Treasurer+Manager"
    );
    assert_eq!(display_label(&roles(&[Role::Owner, Role::Treasurer])), "Owner");
    assert_eq!(
        display_label(&roles(&[Role::Owner, Role::Treasurer, Role::Manager])),
        "Owner"
    );
    assert_eq!(display_label(&roles(&[Role::Treasurer])), "Treasurer");
    assert_eq!(display_label(&roles(&[Role::Manager, Role::Member])), "Manager");
    assert_eq!(
        display_label(&roles(&[Role::Treasurer, Role::Manager, Role::Member])),
        "Treasurer"
    );
    assert_eq!(display_label(&roles(&[Role::Member])), "Member");
    assert_eq!(display_label(&RoleSet::single(Role::Pending)), "Pending");

    for subset in approved_role_subsets() {
        let label = display_label(&roles(&subset));
        let exact = subset.len() == 2
            && subset.contains(&Role::Treasurer)
            && subset.contains(&Role::Manager);
        assert_eq!(label == "Treasurer+Manager", exact, "subset {:?}", subset);
        assert_eq!(
            display_color(&roles(&subset)) == BadgeColor::Violet,
            exact,
            "subset {:?}",
            subset
        );
    }
}

#[test]
fn test_display_colors() {
    assert_eq!(display_color(&roles(&[Role::Owner, Role::Manager])), BadgeColor::Gold);
    assert_eq!(
        display_color(&roles(&[Role::Treasurer, Role::Manager])),
        BadgeColor::Violet
    );
    assert_eq!(display_color(&roles(&[Role::Treasurer])), BadgeColor::Emerald);
    assert_eq!(display_color(&roles(&[Role::Manager])), BadgeColor::Blue);
    assert_eq!(display_color(&roles(&[Role::Member])), BadgeColor::Gray);
    assert_eq!(display_color(&RoleSet::single(Role::Pending)), BadgeColor::Slate);
    assert_eq!(
        display_color(&roles(&[Role::Treasurer, Role::Manager, Role::Member])),
        BadgeColor::Emerald
    );
}

#[test]
fn test_resolver_reads_fixture_roles() {
    let _ = env_logger::try_init();
    let storage = fixture_storage();
    let table = RoleTable::standard();
    let resolver = RoleResolver::new(&storage, &table, "u1");

    assert_eq!(resolver.resolve_primary_role("g1"), Role::Owner);
    assert_eq!(resolver.resolve_permissions("g1"), PermissionSet::all());
    assert_eq!(resolver.display_label("g1"), "Owner");

    assert_eq!(resolver.resolve_primary_role("g2"), Role::Treasurer);
    assert_eq!(resolver.display_label("g2"), "Treasurer+Manager");
    assert_eq!(resolver.display_color("g2"), BadgeColor::Violet);
    let g2 = resolver.resolve_permissions("g2");
    assert!(g2.can_withdraw && g2.can_manage_members);
    assert!(!g2.can_assign_roles && !g2.can_change_management_type);

    assert_eq!(resolver.resolve_primary_role("g3"), Role::Member);
    assert_eq!(resolver.resolve_primary_role("g4"), Role::Pending);
    assert!(resolver.resolve_permissions("g4").is_empty());
}

#[test]
fn test_missing_group_defaults_to_member() {
    let storage = fixture_storage();
    let table = RoleTable::standard();
    let resolver = RoleResolver::new(&storage, &table, "u1");

    assert_eq!(resolver.role_set("nope"), RoleSet::single(Role::Member));
    assert_eq!(resolver.resolve_primary_role("nope"), Role::Member);
    assert!(resolver.resolve_permissions("nope").is_empty());

    let stranger = RoleResolver::new(&storage, &table, "u4");
    assert_eq!(stranger.resolve_primary_role("g1"), Role::Member);
}

#[test]
fn test_strict_lookup_distinguishes_missing_group_and_non_member() {
    let storage = fixture_storage();
    let table = RoleTable::standard();

    let resolver = RoleResolver::new(&storage, &table, "u4");
    assert_eq!(
        resolver.try_role_set("nope"),
        Err(MoimError::GroupNotFound("nope".to_string()))
    );
    assert_eq!(
        resolver.try_role_set("g1"),
        Err(MoimError::UserNotMember("u4".to_string()))
    );

    let pending = RoleResolver::new(&storage, &table, "u5");
    assert!(pending.try_role_set("g1").is_ok());
    assert_eq!(
        pending.try_approved_role_set("g1"),
        Err(MoimError::UserNotMember("u5".to_string()))
    );
}

#[test]
fn test_resolver_is_idempotent() {
    let storage = fixture_storage();
    let table = RoleTable::standard();
    let resolver = RoleResolver::new(&storage, &table, "u1");

    for group in ["g1", "g2", "g3", "g4", "nope"] {
        assert_eq!(resolver.resolve_permissions(group), resolver.resolve_permissions(group));
        assert_eq!(resolver.resolve_primary_role(group), resolver.resolve_primary_role(group));
        assert_eq!(resolver.display_label(group), resolver.display_label(group));
        assert_eq!(resolver.display_color(group), resolver.display_color(group));
    }
    assert_eq!(resolver.my_role("g2"), resolver.my_role("g2"));
}

#[test]
fn test_my_role_view_serializes_for_clients() {
    let storage = fixture_storage();
    let table = RoleTable::standard();
    let view = RoleResolver::new(&storage, &table, "u1").my_role("g2").unwrap();
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["primaryRole"], "treasurer");
    assert_eq!(json["roles"], serde_json::json!(["treasurer", "manager"]));
    assert_eq!(json["label"], "Treasurer+Manager");
    assert_eq!(json["color"], "violet");
    assert_eq!(json["permissions"]["canWithdraw"], true);
    assert_eq!(json["permissions"]["canAssignRoles"], false);
}
