//! Role and capability evaluation for edudesk actors.
//!
//! Answers "may this actor perform capability X" for gating user-facing
//! actions. Resolution is two-tier: an explicit per-user flag wins when set,
//! otherwise the role default table decides, otherwise the answer is `false`.
//!
//! This is a convenience gate for the client. The backend enforces every
//! permission on its own; nothing here is an authorization boundary.
//!
//! # Example
//!
//! ```
//! use edudesk_access::{Actor, Capability, Role, can};
//!
//! let actor = Actor::new("u1", Role::Sales).with_flag(Capability::ExportLeads, true);
//! assert!(can(&actor, Capability::ExportLeads));
//! assert!(!can(&actor, Capability::ManageUsers));
//! ```

mod actor;
mod capability;
mod error;
mod evaluator;
mod role;

pub use actor::{Actor, Permissions, TeamRef};
pub use capability::Capability;
pub use error::{AccessError, Result};
pub use evaluator::{can, can_opt, capabilities, default_roles, has_explicit_permission, has_role};
pub use role::Role;
