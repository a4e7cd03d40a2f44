//! Bulk action tests.
//!
//! Action permission and visibility are checked separately: seeing a lead
//! does not imply being allowed to act on it.

use leadway::{BulkAction, Client, ClientId, ClientStatus, Error, Policy, Role, User};

fn clients() -> Vec<Client> {
    vec![
        Client::new("1", ClientStatus::Lead, "t").assigned("a"),
        Client::new("2", ClientStatus::Lead, "t"),
    ]
}

/// A trainee can see its own lead but cannot export it.
#[test]
fn visible_but_not_actionable() {
    let trainee = User::new("t", Role::Trainee);
    let policy = Policy::builtin();
    assert_eq!(policy.visible_clients(&clients(), Some(&trainee)).len(), 2);

    let result = BulkAction::Export.authorize(
        &policy,
        Some(&trainee),
        &[ClientId::new("1")],
        &clients(),
    );
    assert!(matches!(result, Err(Error::Forbidden { .. })));
    assert!(result.unwrap_err().is_denial());
}

/// Sub-admins delete, but only what they can see.
#[test]
fn sub_admin_delete_drops_unknown_ids() {
    let sub_admin = User::new("s", Role::SubAdmin);
    let allowed = BulkAction::Delete
        .authorize(
            &Policy::builtin(),
            Some(&sub_admin),
            &[ClientId::new("2"), ClientId::new("ghost")],
            &clients(),
        )
        .unwrap();
    assert_eq!(allowed, vec![ClientId::new("2")]);
}
