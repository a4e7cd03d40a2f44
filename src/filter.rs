//! Search, status, assignee and quick filters over already-visible entities.
//!
//! These filters only narrow. They never consult permissions, except that
//! the assignee filter is inert for viewers without blanket visibility.
//!
//! Due dates are parsed on demand. A due date that cannot be parsed is
//! treated as never due: it matches no date quick filter and sorts last.

use std::collections::BTreeSet;

use jiff::Timestamp;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::model::{Client, ClientStatus, Task, User, UserId};
use crate::permission::{Permission, Registry};
use crate::visibility::Policy;

/// Sentinel accepted by status and assignee selections for "no filter".
pub const ALL: &str = "All";

/// Sentinel selecting clients with no assignee.
pub const UNASSIGNED: &str = "_unassigned_";

/// Accepted client statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every status.
    #[default]
    Any,
    /// Any status in the set.
    OneOf(BTreeSet<ClientStatus>),
}

impl StatusFilter {
    pub fn only(status: ClientStatus) -> Self {
        Self::OneOf(BTreeSet::from([status]))
    }

    /// Normalize a selection of status names.
    ///
    /// The sentinel [`ALL`] anywhere in the selection, or an empty selection,
    /// accepts every status. Every other name must be a known status wherever
    /// it appears.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut set = BTreeSet::new();
        let mut any = false;
        for name in names {
            let name = name.as_ref();
            if name.eq_ignore_ascii_case(ALL) {
                any = true;
                continue;
            }
            let status = ClientStatus::parse(name)
                .ok_or_else(|| Error::BadRequest(format!("Unknown status: {name}")))?;
            set.insert(status);
        }
        if any || set.is_empty() {
            Ok(Self::Any)
        } else {
            Ok(Self::OneOf(set))
        }
    }

    pub fn matches(&self, status: ClientStatus) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(set) => set.contains(&status),
        }
    }
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            One(String),
            Many(Vec<String>),
        }

        let names = match Shape::deserialize(deserializer)? {
            Shape::One(name) => vec![name],
            Shape::Many(names) => names,
        };
        Self::from_names(&names).map_err(serde::de::Error::custom)
    }
}

/// Assignee selection for client lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssigneeFilter {
    #[default]
    All,
    Unassigned,
    Agent(UserId),
}

impl AssigneeFilter {
    pub fn parse(s: &str) -> Self {
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            Self::All
        } else if s == UNASSIGNED {
            Self::Unassigned
        } else {
            Self::Agent(UserId::new(s))
        }
    }

    pub fn matches(&self, client: &Client) -> bool {
        match self {
            Self::All => true,
            Self::Unassigned => client.assigned_to.is_none(),
            Self::Agent(id) => client.is_assigned_to(id),
        }
    }
}

impl<'de> Deserialize<'de> for AssigneeFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Case-insensitive search on name and email; raw substring on phone.
fn client_matches_search(client: &Client, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    client.name.to_lowercase().contains(&needle)
        || client.email.to_lowercase().contains(&needle)
        || client.phone.contains(search)
}

/// Filter selections for the lead list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientQuery {
    pub search: String,
    pub status: StatusFilter,
    pub assignee: AssigneeFilter,
}

impl ClientQuery {
    /// Narrow an already-visible list.
    pub fn apply<'a>(
        &self,
        registry: &Registry,
        user: Option<&User>,
        visible: &[&'a Client],
    ) -> Vec<&'a Client> {
        let assignee_active = registry.allows(user, Permission::ViewAllLeads);
        visible
            .iter()
            .copied()
            .filter(|c| client_matches_search(c, &self.search))
            .filter(|c| self.status.matches(c.status))
            .filter(|c| !assignee_active || self.assignee.matches(c))
            .collect()
    }

    /// Visibility then narrowing, in one pass.
    pub fn run<'a>(
        &self,
        policy: &Policy,
        clients: &'a [Client],
        user: Option<&User>,
    ) -> Vec<&'a Client> {
        let visible = policy.visible_clients(clients, user);
        self.apply(policy.registry(), user, &visible)
    }
}

/// Parse an upstream due date into a wall-clock datetime in `tz`.
///
/// Accepts RFC 3339 timestamps, civil datetimes and plain dates. Returns
/// `None` for anything else.
pub fn parse_due(raw: &str, tz: &TimeZone) -> Option<DateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Some(ts.to_zoned(tz.clone()).datetime());
    }
    if let Ok(dt) = raw.parse::<DateTime>() {
        return Some(dt);
    }
    raw.parse::<Date>()
        .ok()
        .map(|d| d.to_datetime(Time::midnight()))
}

/// Mutually exclusive task list presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum QuickFilter {
    #[default]
    All,
    Today,
    Tomorrow,
    Overdue,
    Completed,
}

impl QuickFilter {
    /// Whether a task with parsed due date `due` passes, relative to `reference`.
    pub fn matches(&self, task: &Task, due: Option<DateTime>, reference: Date) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Today => due.is_some_and(|d| d.date() == reference),
            Self::Tomorrow => match reference.tomorrow() {
                Ok(next) => due.is_some_and(|d| d.date() == next),
                Err(_) => false,
            },
            Self::Overdue => {
                let start_of_day = reference.to_datetime(Time::midnight());
                !task.completed && due.is_some_and(|d| d < start_of_day)
            }
        }
    }
}

/// Filter selections for the task list.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    pub quick: QuickFilter,
    pub search: String,
    /// The "selected date" quick filters are relative to.
    pub reference: Date,
    pub time_zone: TimeZone,
}

impl TaskQuery {
    pub fn new(reference: Date, time_zone: TimeZone) -> Self {
        Self {
            quick: QuickFilter::All,
            search: String::new(),
            reference,
            time_zone,
        }
    }

    /// A query relative to the current date in `time_zone`.
    pub fn today(time_zone: TimeZone) -> Self {
        let reference = Timestamp::now().to_zoned(time_zone.clone()).date();
        Self::new(reference, time_zone)
    }

    pub fn quick(mut self, quick: QuickFilter) -> Self {
        self.quick = quick;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }

    /// Narrow an already-visible list and order it by due date, earliest first.
    pub fn apply<'a>(&self, visible: &[&'a Task]) -> Vec<&'a Task> {
        let mut keyed: Vec<(Option<DateTime>, &'a Task)> = visible
            .iter()
            .copied()
            .filter(|t| self.matches_search(t))
            .map(|t| (parse_due(&t.due_date, &self.time_zone), t))
            .filter(|(due, t)| self.quick.matches(t, *due, self.reference))
            .collect();
        keyed.sort_by_key(|(due, _)| (due.is_none(), *due));
        keyed.into_iter().map(|(_, t)| t).collect()
    }

    /// Visibility then narrowing, in one pass.
    pub fn run<'a>(
        &self,
        policy: &Policy,
        tasks: &'a [Task],
        clients: &[Client],
        user: Option<&User>,
    ) -> Vec<&'a Task> {
        let visible = policy.visible_tasks(tasks, clients, user);
        self.apply(&visible)
    }
}
