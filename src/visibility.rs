//! Visibility: which clients and tasks a user may list.
//!
//! Visibility is decided before any search or status narrowing and is kept
//! separate from action permissions. A user may see a lead they cannot edit.
//!
//! Each viewer is mapped to one [`Strategy`]:
//!
//! | Viewer                                   | Clients       | Tasks                    |
//! |------------------------------------------|---------------|--------------------------|
//! | holds `view_all_leads`                   | AllAccess     | (by role, below)         |
//! | role in the task "view all" set          | (by grant)    | AllAccess                |
//! | Trainee                                  | OwnCreated    | OwnCreated               |
//! | Agent                                    | OwnAssigned   | OwnAssigned              |
//! | any other role                           | OwnAssigned   | OwnCreatedOrAssigned     |
//!
//! Non-privileged task visibility follows the linked client; internal tasks
//! (no client) are only listed for privileged viewers.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Client, ClientId, Task, User, UserId};
use crate::permission::{Permission, Registry, Role};

/// Rule narrowing a collection to what one viewer may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Everything.
    AllAccess,
    /// Clients the viewer created.
    OwnCreated,
    /// Clients assigned to the viewer.
    OwnAssigned,
    /// Clients the viewer created or is assigned to.
    OwnCreatedOrAssigned,
}

impl Strategy {
    /// Whether `client` passes this strategy for `viewer`.
    pub fn admits(&self, client: &Client, viewer: &UserId) -> bool {
        match self {
            Self::AllAccess => true,
            Self::OwnCreated => &client.created_by == viewer,
            Self::OwnAssigned => client.is_assigned_to(viewer),
            Self::OwnCreatedOrAssigned => {
                &client.created_by == viewer || client.is_assigned_to(viewer)
            }
        }
    }
}

/// Grant table plus the roles that see every task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    registry: Registry,
    task_view_all: BTreeSet<Role>,
}

impl Policy {
    pub fn new(registry: Registry, task_view_all: impl IntoIterator<Item = Role>) -> Self {
        Self {
            registry,
            task_view_all: task_view_all.into_iter().collect(),
        }
    }

    /// The built-in grant table with Admin, SubAdmin and TeamLead seeing every task.
    pub fn builtin() -> Self {
        Self::new(
            Registry::builtin(),
            [Role::Admin, Role::SubAdmin, Role::TeamLead],
        )
    }

    /// Build a policy from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = Registry::from_grants(&config.permissions)?;
        let task_view_all = config
            .visibility
            .task_view_all
            .iter()
            .map(|name| {
                Role::parse(name).ok_or_else(|| {
                    Error::Config(format!("Unknown role in visibility.task_view_all: {name}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(registry, task_view_all))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Strategy for listing clients.
    pub fn client_strategy(&self, user: &User) -> Strategy {
        let strategy = if self.registry.grants(user.role, Permission::ViewAllLeads) {
            Strategy::AllAccess
        } else if user.role == Role::Trainee {
            Strategy::OwnCreated
        } else {
            Strategy::OwnAssigned
        };
        tracing::debug!(user = %user.id, role = %user.role, ?strategy, "client visibility");
        strategy
    }

    /// Strategy for listing tasks.
    ///
    /// For non-privileged viewers this is the rule applied to the linked client.
    pub fn task_strategy(&self, user: &User) -> Strategy {
        let strategy = if self.task_view_all.contains(&user.role) {
            Strategy::AllAccess
        } else {
            match user.role {
                Role::Agent => Strategy::OwnAssigned,
                Role::Trainee => Strategy::OwnCreated,
                _ => Strategy::OwnCreatedOrAssigned,
            }
        };
        tracing::debug!(user = %user.id, role = %user.role, ?strategy, "task visibility");
        strategy
    }

    /// Clients `user` may list. No user sees nothing.
    pub fn visible_clients<'a>(
        &self,
        clients: &'a [Client],
        user: Option<&User>,
    ) -> Vec<&'a Client> {
        let Some(user) = user else {
            return Vec::new();
        };
        let strategy = self.client_strategy(user);
        clients
            .iter()
            .filter(|c| strategy.admits(c, &user.id))
            .collect()
    }

    /// Tasks `user` may list. No user sees nothing.
    pub fn visible_tasks<'a>(
        &self,
        tasks: &'a [Task],
        clients: &[Client],
        user: Option<&User>,
    ) -> Vec<&'a Task> {
        let Some(user) = user else {
            return Vec::new();
        };
        let strategy = self.task_strategy(user);
        if strategy == Strategy::AllAccess {
            return tasks.iter().collect();
        }

        let client_ids: HashSet<&ClientId> = clients
            .iter()
            .filter(|c| strategy.admits(c, &user.id))
            .map(|c| &c.id)
            .collect();

        tasks
            .iter()
            .filter(|t| t.client_id.as_ref().is_some_and(|id| client_ids.contains(id)))
            .collect()
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::builtin()
    }
}

static POLICY: LazyLock<Policy> = LazyLock::new(Policy::builtin);

/// Clients `user` may list under the built-in policy.
pub fn visible_clients<'a>(clients: &'a [Client], user: Option<&User>) -> Vec<&'a Client> {
    POLICY.visible_clients(clients, user)
}

/// Tasks `user` may list under the built-in policy.
pub fn visible_tasks<'a>(
    tasks: &'a [Task],
    clients: &[Client],
    user: Option<&User>,
) -> Vec<&'a Task> {
    POLICY.visible_tasks(tasks, clients, user)
}
