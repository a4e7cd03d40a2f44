//! Entity snapshots handed to the policy core by the data layer.
//!
//! The core only reads these values. Field names follow the data layer's
//! camelCase JSON so a snapshot can be imported as-is.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::permission::Role;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

/// Ids arrive as strings or integers depending on the storage backend.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

id_type!(
    /// Identifier of a [`User`].
    UserId
);
id_type!(
    /// Identifier of a [`Client`].
    ClientId
);
id_type!(
    /// Identifier of a [`Task`].
    TaskId
);

/// Empty strings and nulls both mean "no user".
fn optional_user<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<UserId>, D::Error> {
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw
        .map(RawId::into_string)
        .filter(|s| !s.is_empty())
        .map(UserId))
}

fn optional_client<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ClientId>, D::Error> {
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw
        .map(RawId::into_string)
        .filter(|s| !s.is_empty())
        .map(ClientId))
}

/// An authenticated CRM user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(id),
            name: String::new(),
            email: String::new(),
            role,
        }
    }
}

/// Pipeline stage of a lead.
///
/// Deserializes through [`ClientStatus::parse`], so snapshots accept the
/// same spellings as filter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ClientStatus {
    Lead,
    FollowUp,
    Approved,
    Active,
    Rejected,
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 5] = [
        ClientStatus::Lead,
        ClientStatus::FollowUp,
        ClientStatus::Approved,
        ClientStatus::Active,
        ClientStatus::Rejected,
    ];

    /// Parse a status name, ignoring case and separators.
    pub fn parse(s: &str) -> Option<Self> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "lead" | "new" => Some(Self::Lead),
            "followup" => Some(Self::FollowUp),
            "approved" => Some(Self::Approved),
            "active" => Some(Self::Active),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Human readable label used by list badges and exports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::FollowUp => "Follow Up",
            Self::Approved => "Approved",
            Self::Active => "Active",
            Self::Rejected => "Rejected",
        }
    }

    /// Statuses counted as a won lead.
    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Approved | Self::Active)
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ClientStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown client status: {raw}")))
    }
}

/// A lead / loan client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub status: ClientStatus,
    #[serde(default, deserialize_with = "optional_user")]
    pub assigned_to: Option<UserId>,
    pub created_by: UserId,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub loan_type: Option<String>,
    /// Attributes consumed only by rendering and export.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Client {
    pub fn new(id: impl Into<String>, status: ClientStatus, created_by: impl Into<String>) -> Self {
        Self {
            id: ClientId::new(id),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            status,
            assigned_to: None,
            created_by: UserId::new(created_by),
            loan_amount: None,
            loan_type: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn assigned(mut self, user: impl Into<String>) -> Self {
        self.assigned_to = Some(UserId::new(user));
        self
    }

    pub fn is_assigned_to(&self, user: &UserId) -> bool {
        self.assigned_to.as_ref() == Some(user)
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A follow-up task, optionally linked to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `None` marks an internal task with no client.
    #[serde(default, deserialize_with = "optional_client")]
    pub client_id: Option<ClientId>,
    /// Raw due date as stored upstream; parsed on demand by the filters.
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "optional_user")]
    pub assigned_to: Option<UserId>,
}

impl Task {
    pub fn new(id: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(id),
            title: String::new(),
            description: String::new(),
            client_id: None,
            due_date: due_date.into(),
            completed: false,
            priority: Priority::default(),
            assigned_to: None,
        }
    }

    pub fn for_client(mut self, client: impl Into<String>) -> Self {
        self.client_id = Some(ClientId::new(client));
        self
    }

    pub fn is_internal(&self) -> bool {
        self.client_id.is_none()
    }
}

/// Read-only copy of the data layer's collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub clients: Vec<Client>,
    pub tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    users: Vec<serde_json::Value>,
    #[serde(default)]
    clients: Vec<Client>,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl Snapshot {
    /// Import a `{ "users": [...], "clients": [...], "tasks": [...] }` document.
    ///
    /// Users whose role is outside the known set are dropped: they can never
    /// hold a session, which leaves them with no access at all.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        let mut users = Vec::with_capacity(raw.users.len());
        for value in raw.users {
            match serde_json::from_value::<User>(value) {
                Ok(user) => users.push(user),
                Err(e) => tracing::warn!("Skipping user record: {e}"),
            }
        }
        Ok(Self {
            users,
            clients: raw.clients,
            tasks: raw.tasks,
        })
    }

    /// Find a user by id.
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }
}
