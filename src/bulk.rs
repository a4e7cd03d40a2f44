//! Bulk actions over a lead-list selection.
//!
//! A bulk action needs two things: the action permission, and a selection
//! inside what the user can see. Ids outside the visible set are dropped
//! rather than acted on.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{Client, ClientId, ClientStatus, User, UserId};
use crate::permission::Permission;
use crate::visibility::Policy;

/// An action applied to many clients at once.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BulkAction {
    Assign { to: UserId },
    ChangeStatus { status: ClientStatus },
    Email,
    Export,
    Delete,
}

impl BulkAction {
    pub fn required_permission(&self) -> Permission {
        match self {
            Self::Assign { .. } => Permission::AssignLeads,
            Self::ChangeStatus { .. } => Permission::EditLeads,
            Self::Email => Permission::BulkEmail,
            Self::Export => Permission::ExportLeads,
            Self::Delete => Permission::DeleteLeads,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "assign",
            Self::ChangeStatus { .. } => "update",
            Self::Email => "email",
            Self::Export => "export",
            Self::Delete => "delete",
        }
    }

    /// Check the action and narrow `selected` to clients `user` can see.
    ///
    /// # Returns
    /// - `Ok(ids)` in selection order, with invisible or unknown ids removed
    /// - `Err(Error::Unauthorized)` without a user
    /// - `Err(Error::Forbidden)` if the user lacks the action permission
    /// - `Err(Error::BadRequest)` if nothing actionable remains
    pub fn authorize(
        &self,
        policy: &Policy,
        user: Option<&User>,
        selected: &[ClientId],
        clients: &[Client],
    ) -> Result<Vec<ClientId>> {
        let user = user.ok_or(Error::Unauthorized)?;
        if !policy.registry().grants(user.role, self.required_permission()) {
            return Err(Error::Forbidden {
                resource: "leads".to_string(),
                action: self.verb().to_string(),
            });
        }

        let visible: HashSet<&ClientId> = policy
            .visible_clients(clients, Some(user))
            .into_iter()
            .map(|c| &c.id)
            .collect();

        let mut seen = HashSet::new();
        let mut allowed = Vec::with_capacity(selected.len());
        for id in selected {
            if !seen.insert(id) {
                continue;
            }
            if visible.contains(id) {
                allowed.push(id.clone());
            } else {
                tracing::warn!(
                    user = %user.id,
                    client = %id,
                    "Dropping client outside visible set from bulk {}",
                    self.verb()
                );
            }
        }

        if allowed.is_empty() {
            return Err(Error::BadRequest("No visible clients selected".to_string()));
        }
        Ok(allowed)
    }
}
