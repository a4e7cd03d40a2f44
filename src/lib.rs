//! Leadway - Permission and visibility policy core for a loan/lead CRM.
//!
//! Leadway answers two questions for the UI layer:
//!
//! - **Permission**: may this user perform this action? (`has_permission`)
//! - **Visibility**: which leads and tasks may this user list?
//!   (`visible_clients`, `visible_tasks`)
//!
//! On top of those it provides composable list filters, dashboard counters,
//! bulk-action authorization and formatting helpers. Everything is a pure
//! function over snapshots supplied by the caller; nothing is mutated or
//! cached between calls.
//!
//! # Example
//!
//! ```ignore
//! use leadway::{ClientQuery, Policy, Role, StatusFilter, User};
//!
//! let config = leadway::ConfigLoader::new("MYCRM").load(None, None, None)?;
//! let policy = Policy::from_config(&config)?;
//!
//! let agent = User::new("a1", Role::Agent);
//! let snapshot = leadway::Snapshot::from_json(&json)?;
//!
//! let query = ClientQuery {
//!     status: StatusFilter::from_names(&["Approved", "Active"])?,
//!     ..Default::default()
//! };
//! let rows = query.run(&policy, &snapshot.clients, Some(&agent));
//! ```

pub mod bulk;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod format;
pub mod model;
pub mod permission;
pub mod view;
pub mod visibility;

// Re-export main types at crate root
pub use bulk::BulkAction;
pub use config::{Config, ConfigLoader};
pub use dashboard::Summary;
pub use error::{Error, Result};
pub use filter::{AssigneeFilter, ClientQuery, QuickFilter, StatusFilter, TaskQuery};
pub use model::{Client, ClientId, ClientStatus, Priority, Snapshot, Task, TaskId, User, UserId};
pub use permission::{Permission, Registry, Role, has_permission, has_permission_token};
pub use view::{View, accessible_views, can_enter};
pub use visibility::{Policy, Strategy, visible_clients, visible_tasks};
