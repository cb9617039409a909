//! Capability resolution: `explicit ?? role_default ?? false`.

use crate::actor::Actor;
use crate::capability::Capability;
use crate::role::Role;

/// Roles granted `capability` when no explicit flag is set.
pub fn default_roles(capability: Capability) -> &'static [Role] {
    use Role::*;

    match capability {
        Capability::ManageUsers => &[Superadmin, Admin],
        Capability::ManageTeams => &[Superadmin, Admin, SalesManager],
        Capability::ViewAllLeads => &[Superadmin, Admin, SalesManager],
        Capability::AssignLeads => &[Superadmin, Admin, SalesManager, TeamLead],
        Capability::ExportLeads => &[Superadmin, Admin, SalesManager, TeamLead],
        Capability::ViewReports => &[Superadmin, Admin, SalesManager],
        Capability::ViewAllReports => &[Superadmin, Admin],
        Capability::EditSettings => &[Superadmin],
        Capability::DeleteLeads => &[Superadmin, Admin],
        Capability::ManageContent => &[Superadmin, Admin, Instructor],
    }
}

pub fn has_role(actor: &Actor, candidates: &[Role]) -> bool {
    candidates.contains(&actor.role)
}

pub fn has_explicit_permission(actor: &Actor, capability: Capability) -> Option<bool> {
    actor.permissions.get(capability)
}

pub fn can(actor: &Actor, capability: Capability) -> bool {
    has_explicit_permission(actor, capability)
        .unwrap_or_else(|| has_role(actor, default_roles(capability)))
}

/// Like [`can`], but an absent actor is always denied.
pub fn can_opt(actor: Option<&Actor>, capability: Capability) -> bool {
    actor.is_some_and(|actor| can(actor, capability))
}

/// Every capability the actor is granted, in declaration order.
pub fn capabilities(actor: &Actor) -> Vec<Capability> {
    Capability::ALL
        .into_iter()
        .filter(|capability| can(actor, *capability))
        .collect()
}

impl Actor {
    pub fn can(&self, capability: Capability) -> bool {
        can(self, capability)
    }

    pub fn has_role(&self, candidates: &[Role]) -> bool {
        has_role(self, candidates)
    }
}
