//! Roles, the permission catalogue, and the role → permission grant table.
//!
//! Grants are an explicit set per role, not a hierarchy. The highest-privilege
//! role is granted the whole catalogue by union over [`Permission::ALL`], so a
//! token added to the catalogue is granted to it without a separate listing.
//!
//! # Example
//!
//! ```ignore
//! use leadway::{Permission, Role, User, has_permission};
//!
//! let agent = User::new("a1", Role::Agent);
//! assert!(has_permission(Some(&agent), Permission::ViewLeads));
//! assert!(!has_permission(Some(&agent), Permission::ViewAllLeads));
//! assert!(!has_permission(None, Permission::ViewLeads));
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::config::Permissions as PermissionsConfig;
use crate::error::{Error, Result};
use crate::model::User;

/// User role. Exactly one per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "Admin")]
    Admin,
    #[serde(alias = "SubAdmin", alias = "subadmin")]
    SubAdmin,
    #[serde(alias = "TeamLead", alias = "teamlead")]
    TeamLead,
    #[serde(alias = "Agent")]
    Agent,
    #[serde(alias = "Trainee")]
    Trainee,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::SubAdmin,
        Role::TeamLead,
        Role::Agent,
        Role::Trainee,
    ];

    /// Parse role from string, ignoring case and separators.
    pub fn parse(s: &str) -> Option<Self> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "admin" => Some(Self::Admin),
            "subadmin" => Some(Self::SubAdmin),
            "teamlead" => Some(Self::TeamLead),
            "agent" => Some(Self::Agent),
            "trainee" => Some(Self::Trainee),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SubAdmin => "sub_admin",
            Self::TeamLead => "team_lead",
            Self::Agent => "agent",
            Self::Trainee => "trainee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declares the permission catalogue once: the enum, [`Permission::ALL`] and
/// the token names all come from this list.
macro_rules! permission_catalogue {
    ($( $(#[$group:meta])* $variant:ident => $token:literal, )+) => {
        /// A grantable capability. The catalogue is closed.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Permission {
            $(
                $(#[$group])*
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl Permission {
            /// Every token that exists.
            pub const ALL: &'static [Permission] = &[$(Permission::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }
        }
    };
}

permission_catalogue! {
    // View access
    ViewDashboard => "view_dashboard",
    ViewLeads => "view_leads",
    ViewAllLeads => "view_all_leads",
    ViewTasks => "view_tasks",
    ViewReports => "view_reports",
    ViewSettings => "view_settings",

    // Lead management
    CreateLeads => "create_leads",
    EditLeads => "edit_leads",
    DeleteLeads => "delete_leads",
    AssignLeads => "assign_leads",
    ExportLeads => "export_leads",
    BulkEmail => "bulk_email",
    MakeCalls => "make_calls",

    // Task management
    CreateTasks => "create_tasks",
    EditTasks => "edit_tasks",
    DeleteTasks => "delete_tasks",
    AssignTasks => "assign_tasks",

    // Administration
    ManageUsers => "manage_users",
    ManageSettings => "manage_settings",
    ManageRoles => "manage_roles",

    // Destructive
    ResetData => "reset_data",
}

impl Permission {
    /// Parse a token name. Unknown tokens yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role that holds the entire catalogue.
pub const FULL_ACCESS_ROLE: Role = Role::Admin;

const SUB_ADMIN_EXCLUDED: &[Permission] = &[Permission::ManageRoles, Permission::ResetData];

const TEAM_LEAD_GRANTS: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewLeads,
    Permission::ViewAllLeads,
    Permission::ViewTasks,
    Permission::ViewReports,
    Permission::CreateLeads,
    Permission::EditLeads,
    Permission::AssignLeads,
    Permission::ExportLeads,
    Permission::BulkEmail,
    Permission::MakeCalls,
    Permission::CreateTasks,
    Permission::EditTasks,
    Permission::DeleteTasks,
    Permission::AssignTasks,
];

const AGENT_GRANTS: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewLeads,
    Permission::ViewTasks,
    Permission::CreateLeads,
    Permission::EditLeads,
    Permission::MakeCalls,
    Permission::CreateTasks,
    Permission::EditTasks,
];

const TRAINEE_GRANTS: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewLeads,
    Permission::ViewTasks,
    Permission::CreateLeads,
    Permission::CreateTasks,
];

/// Immutable role → permission table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    grants: HashMap<Role, BTreeSet<Permission>>,
}

impl Registry {
    /// An empty table containing only the full-access role.
    fn with_full_access() -> Self {
        let mut grants = HashMap::new();
        grants.insert(FULL_ACCESS_ROLE, Permission::ALL.iter().copied().collect());
        Self { grants }
    }

    /// The default grant table.
    pub fn builtin() -> Self {
        let mut registry = Self::with_full_access();
        let sub_admin = Permission::ALL
            .iter()
            .copied()
            .filter(|p| !SUB_ADMIN_EXCLUDED.contains(p))
            .collect();
        registry.grants.insert(Role::SubAdmin, sub_admin);
        registry
            .grants
            .insert(Role::TeamLead, TEAM_LEAD_GRANTS.iter().copied().collect());
        registry
            .grants
            .insert(Role::Agent, AGENT_GRANTS.iter().copied().collect());
        registry
            .grants
            .insert(Role::Trainee, TRAINEE_GRANTS.iter().copied().collect());
        registry
    }

    /// Build a table from configured grants.
    ///
    /// Roles absent from the configuration keep their built-in grants. The
    /// full-access role can never be narrowed; an entry for it is ignored.
    pub fn from_grants(config: &PermissionsConfig) -> Result<Self> {
        let mut registry = Self::builtin();
        for (role_name, tokens) in &config.grants {
            let role = Role::parse(role_name)
                .ok_or_else(|| Error::Config(format!("Unknown role in grants: {role_name}")))?;
            if role == FULL_ACCESS_ROLE {
                tracing::warn!("Ignoring configured grants for {role}: it holds every permission");
                continue;
            }
            let mut set = BTreeSet::new();
            for token in tokens {
                let permission = Permission::parse(token).ok_or_else(|| {
                    Error::Config(format!("Unknown permission '{token}' granted to {role}"))
                })?;
                set.insert(permission);
            }
            registry.grants.insert(role, set);
        }
        Ok(registry)
    }

    /// Permissions held by `role`. Roles missing from the table hold nothing.
    pub fn permissions(&self, role: Role) -> impl Iterator<Item = Permission> + '_ {
        self.grants.get(&role).into_iter().flatten().copied()
    }

    /// Whether `role` holds `permission`.
    pub fn grants(&self, role: Role, permission: Permission) -> bool {
        match self.grants.get(&role) {
            Some(set) => set.contains(&permission),
            None => {
                tracing::warn!("No grants defined for role {role}; denying {permission}");
                false
            }
        }
    }

    /// Whether the (possibly absent) user holds `permission`.
    pub fn allows(&self, user: Option<&User>, permission: Permission) -> bool {
        user.is_some_and(|u| self.grants(u.role, permission))
    }

    /// Like [`Registry::allows`], for a raw token name. Unknown tokens are denied.
    pub fn allows_token(&self, user: Option<&User>, token: &str) -> bool {
        match Permission::parse(token) {
            Some(permission) => self.allows(user, permission),
            None => {
                tracing::warn!("Unknown permission token '{token}'");
                false
            }
        }
    }

    #[cfg(test)]
    fn without_role(mut self, role: Role) -> Self {
        self.grants.remove(&role);
        self
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::builtin);

/// The process-wide built-in grant table.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Whether `user` holds `permission` under the built-in table.
///
/// An absent user never holds anything.
pub fn has_permission(user: Option<&User>, permission: Permission) -> bool {
    registry().allows(user, permission)
}

/// Token-name form of [`has_permission`].
pub fn has_permission_token(user: Option<&User>, token: &str) -> bool {
    registry().allows_token(user, token)
}
