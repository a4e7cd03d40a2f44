//! Configuration tests.
//!
//! A configured policy must never widen the full-access role's grants from
//! a file, and must reject names it does not know.

use std::io::Write;

use leadway::{ConfigLoader, Permission, Policy, Role, Strategy, User};

/// Grants and task roles from a file flow into the policy.
#[test]
fn file_grants_reach_policy() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[permissions.grants]
agent = ["view_leads", "view_all_leads"]

[visibility]
task_view_all = ["admin", "sub_admin"]
"#
    )
    .unwrap();

    let config = ConfigLoader::new("LWPOLICYTEST")
        .load(Some(file.path()), None, Some("UTC"))
        .unwrap();
    let policy = Policy::from_config(&config).unwrap();

    let agent = User::new("a", Role::Agent);
    assert_eq!(policy.client_strategy(&agent), Strategy::AllAccess);
    assert!(!policy.registry().allows(Some(&agent), Permission::MakeCalls));

    let lead = User::new("l", Role::TeamLead);
    assert_eq!(policy.task_strategy(&lead), Strategy::OwnCreatedOrAssigned);
}

/// An attempt to narrow the admin role from a file is ignored.
#[test]
fn file_cannot_narrow_admin() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[permissions.grants]
Admin = []
"#
    )
    .unwrap();

    let config = ConfigLoader::new("LWADMINTEST")
        .load(Some(file.path()), None, Some("UTC"))
        .unwrap();
    let policy = Policy::from_config(&config).unwrap();
    let admin = User::new("root", Role::Admin);
    assert!(policy.registry().allows(Some(&admin), Permission::ResetData));
}

/// Unknown token names are rejected when the policy is built.
#[test]
fn unknown_token_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[permissions.grants]
trainee = ["view_leads", "self_destruct"]
"#
    )
    .unwrap();

    let config = ConfigLoader::new("LWTOKENTEST")
        .load(Some(file.path()), None, Some("UTC"))
        .unwrap();
    let err = Policy::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("self_destruct"));
}

/// A missing config file is a configuration error, not a panic.
#[test]
fn missing_file_is_config_error() {
    let result = ConfigLoader::new("LWMISSINGTEST").load(
        Some(std::path::Path::new("/nonexistent/leadway.toml")),
        None,
        None,
    );
    assert!(matches!(result, Err(leadway::Error::Config(_))));
}
