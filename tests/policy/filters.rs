//! List filter tests.
//!
//! Secondary filters only narrow the visible set. The assignee filter is
//! inert for viewers without blanket visibility.

use jiff::civil::date;
use jiff::tz::TimeZone;
use leadway::filter::UNASSIGNED;
use leadway::{
    AssigneeFilter, Client, ClientQuery, ClientStatus, Policy, QuickFilter, Role, StatusFilter,
    Task, TaskQuery, User,
};

fn clients() -> Vec<Client> {
    let mut rows = vec![
        Client::new("1", ClientStatus::Lead, "boss").assigned("a"),
        Client::new("2", ClientStatus::Approved, "boss").assigned("b"),
        Client::new("3", ClientStatus::Active, "boss"),
        Client::new("4", ClientStatus::Rejected, "boss").assigned("a"),
        Client::new("5", ClientStatus::Approved, "boss"),
    ];
    rows[0].name = "Meera Iyer".into();
    rows[1].email = "IYER.family@example.com".into();
    rows[2].phone = "(555) 010-2000".into();
    rows
}

fn ids(rows: &[&Client]) -> Vec<String> {
    rows.iter().map(|c| c.id.to_string()).collect()
}

/// `[Approved, Active]` is the union of both statuses and nothing else.
#[test]
fn multi_status_is_union() {
    let all = clients();
    let lead = User::new("lead", Role::TeamLead);
    let query = ClientQuery {
        status: StatusFilter::from_names(&["Approved", "Active"]).unwrap(),
        ..Default::default()
    };
    assert_eq!(ids(&query.run(&Policy::builtin(), &all, Some(&lead))), vec!["2", "3", "5"]);
}

/// "Unassigned" selects exactly the clients with no assignee for a
/// blanket-visibility viewer, and does nothing for anyone else.
#[test]
fn unassigned_only_with_blanket_visibility() {
    let all = clients();
    let query = ClientQuery {
        assignee: AssigneeFilter::parse(UNASSIGNED),
        ..Default::default()
    };

    let admin = User::new("root", Role::Admin);
    assert_eq!(ids(&query.run(&Policy::builtin(), &all, Some(&admin))), vec!["3", "5"]);

    let agent = User::new("a", Role::Agent);
    assert_eq!(ids(&query.run(&Policy::builtin(), &all, Some(&agent))), vec!["1", "4"]);
}

/// A specific agent filter narrows a blanket viewer's list.
#[test]
fn agent_assignee_filter() {
    let all = clients();
    let admin = User::new("root", Role::Admin);
    let query = ClientQuery {
        assignee: AssigneeFilter::parse("a"),
        ..Default::default()
    };
    assert_eq!(ids(&query.run(&Policy::builtin(), &all, Some(&admin))), vec!["1", "4"]);
}

/// Search folds case on name and email but matches phone numbers verbatim.
#[test]
fn search_rules() {
    let all = clients();
    let admin = User::new("root", Role::Admin);
    let policy = Policy::builtin();

    let query = ClientQuery {
        search: "iyer".into(),
        ..Default::default()
    };
    assert_eq!(ids(&query.run(&policy, &all, Some(&admin))), vec!["1", "2"]);

    let query = ClientQuery {
        search: "010-2000".into(),
        ..Default::default()
    };
    assert_eq!(ids(&query.run(&policy, &all, Some(&admin))), vec!["3"]);

    let query = ClientQuery {
        search: "5550102000".into(),
        ..Default::default()
    };
    assert!(query.run(&policy, &all, Some(&admin)).is_empty());
}

/// "All" for status and assignee is the identity over the visible set.
#[test]
fn all_sentinels_are_identity() {
    let all = clients();
    let policy = Policy::builtin();
    let query: ClientQuery =
        serde_json::from_str(r#"{"status": "All", "assignee": "All"}"#).unwrap();

    for user in [User::new("root", Role::Admin), User::new("a", Role::Agent)] {
        let visible = policy.visible_clients(&all, Some(&user));
        assert_eq!(
            ids(&query.apply(policy.registry(), Some(&user), &visible)),
            ids(&visible)
        );
    }
}

/// Overdue never lists a completed task, however old.
#[test]
fn overdue_excludes_completed() {
    let mut ancient = Task::new("ancient", "1999-01-01");
    ancient.completed = true;
    let tasks = [ancient, Task::new("late", "2024-03-04"), Task::new("due", "2024-03-05")];
    let visible: Vec<_> = tasks.iter().collect();

    let query = TaskQuery::new(date(2024, 3, 5), TimeZone::UTC).quick(QuickFilter::Overdue);
    let rows: Vec<_> = query.apply(&visible).iter().map(|t| t.id.to_string()).collect();
    assert_eq!(rows, vec!["late"]);
}

/// Task queries run on the visible set and come back sorted by due date.
#[test]
fn task_query_runs_after_visibility() {
    let all_clients = clients();
    let tasks = [
        Task::new("t4", "2024-03-07").for_client("4"),
        Task::new("t2", "2024-03-01").for_client("2"),
        Task::new("t1", "2024-03-06").for_client("1"),
        Task::new("internal", "2024-03-02"),
    ];
    let agent = User::new("a", Role::Agent);
    let query = TaskQuery::new(date(2024, 3, 5), TimeZone::UTC);
    let rows: Vec<_> = query
        .run(&Policy::builtin(), &tasks, &all_clients, Some(&agent))
        .iter()
        .map(|t| t.id.to_string())
        .collect();
    assert_eq!(rows, vec!["t1", "t4"]);
}
