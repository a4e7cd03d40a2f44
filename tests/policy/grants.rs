//! Grant table tests.
//!
//! Verifies that lookups agree with the table for every role and token,
//! that the full-access role is closed over the catalogue, and that missing
//! sessions or unknown tokens fail closed.

use leadway::config::Permissions;
use leadway::{Permission, Registry, Role, User, has_permission, has_permission_token};

/// `has_permission` is true exactly for the tokens listed for the role.
#[test]
fn lookup_agrees_with_table_for_every_role() {
    let registry = Registry::builtin();
    for role in Role::ALL {
        let granted: Vec<Permission> = registry.permissions(role).collect();
        let user = User::new("u", role);
        for &permission in Permission::ALL {
            assert_eq!(
                has_permission(Some(&user), permission),
                granted.contains(&permission),
                "{role} / {permission}"
            );
        }
    }
}

/// The full-access role holds every token in the catalogue, including
/// under a configured table that narrows everybody else.
#[test]
fn admin_is_closed_over_catalogue() {
    let mut config = Permissions::default();
    for role in ["sub_admin", "team_lead", "agent", "trainee"] {
        config.grants.insert(role.to_string(), Vec::new());
    }
    let registry = Registry::from_grants(&config).unwrap();
    let admin = User::new("root", Role::Admin);
    for &permission in Permission::ALL {
        assert!(registry.allows(Some(&admin), permission), "{permission}");
    }
    let agent = User::new("a", Role::Agent);
    assert!(Permission::ALL.iter().all(|p| !registry.allows(Some(&agent), *p)));
}

/// Every token string the catalogue declares is honoured for the
/// full-access role through the string entry point.
#[test]
fn every_declared_token_string_reaches_admin() {
    let admin = User::new("root", Role::Admin);
    for &permission in Permission::ALL {
        let token = permission.as_str();
        assert_eq!(Permission::parse(token), Some(permission));
        assert!(has_permission_token(Some(&admin), token), "{token}");
    }
}

/// No session, no access, for every token.
#[test]
fn absent_user_never_allowed() {
    for &permission in Permission::ALL {
        assert!(!has_permission(None, permission));
        assert!(!has_permission_token(None, permission.as_str()));
    }
}

/// Tokens outside the catalogue are denied even to the full-access role.
#[test]
fn unknown_tokens_fail_closed() {
    let admin = User::new("root", Role::Admin);
    assert!(!has_permission_token(Some(&admin), "VIEW_ALL_LEADS_v2"));
    assert!(!has_permission_token(Some(&admin), ""));
}

/// Trainees cannot reach any administrative or destructive token.
#[test]
fn trainee_has_no_admin_tokens() {
    let trainee = User::new("t", Role::Trainee);
    for permission in [
        Permission::ManageUsers,
        Permission::ManageSettings,
        Permission::ManageRoles,
        Permission::ResetData,
        Permission::DeleteLeads,
        Permission::ViewAllLeads,
    ] {
        assert!(!has_permission(Some(&trainee), permission), "{permission}");
    }
}
