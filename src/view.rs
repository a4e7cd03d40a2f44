//! Navigable views and the permission required to enter each.
//!
//! The map is partial: unguarded views are open to any signed-in user.
//! Navigation consults this map; list filtering never does.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::User;
use crate::permission::{Permission, Registry};

/// A navigable screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Dashboard,
    Leads,
    Tasks,
    Reports,
    Users,
    Settings,
    Profile,
    Notifications,
}

impl View {
    pub const ALL: [View; 8] = [
        View::Dashboard,
        View::Leads,
        View::Tasks,
        View::Reports,
        View::Users,
        View::Settings,
        View::Profile,
        View::Notifications,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Leads => "leads",
            Self::Tasks => "tasks",
            Self::Reports => "reports",
            Self::Users => "users",
            Self::Settings => "settings",
            Self::Profile => "profile",
            Self::Notifications => "notifications",
        }
    }

    /// The single token required to enter this view, if any.
    pub fn required_permission(&self) -> Option<Permission> {
        match self {
            Self::Dashboard => Some(Permission::ViewDashboard),
            Self::Leads => Some(Permission::ViewLeads),
            Self::Tasks => Some(Permission::ViewTasks),
            Self::Reports => Some(Permission::ViewReports),
            Self::Users => Some(Permission::ManageUsers),
            Self::Settings => Some(Permission::ViewSettings),
            Self::Profile | Self::Notifications => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `user` may navigate to `view`. Nobody enters anything without a session.
pub fn can_enter(registry: &Registry, user: Option<&User>, view: View) -> bool {
    match view.required_permission() {
        Some(permission) => registry.allows(user, permission),
        None => user.is_some(),
    }
}

/// Views `user` may navigate to, in menu order.
pub fn accessible_views(registry: &Registry, user: Option<&User>) -> Vec<View> {
    View::ALL
        .into_iter()
        .filter(|view| can_enter(registry, user, *view))
        .collect()
}
