use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::role::Role;

/// Explicit per-user permission flags as sent by the backend.
///
/// `None` means "not specified"; only `Some(_)` overrides the role default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_manage_users: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_manage_teams: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_view_all_leads: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_assign_leads: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_delete_leads: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_export_leads: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_view_reports: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_view_all_reports: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_edit_settings: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_manage_content: Option<bool>,
}

impl Permissions {
    pub fn get(&self, capability: Capability) -> Option<bool> {
        *self.slot(capability)
    }

    pub fn set(&mut self, capability: Capability, value: Option<bool>) {
        *self.slot_mut(capability) = value;
    }

    fn slot(&self, capability: Capability) -> &Option<bool> {
        match capability {
            Capability::ManageUsers => &self.can_manage_users,
            Capability::ManageTeams => &self.can_manage_teams,
            Capability::ViewAllLeads => &self.can_view_all_leads,
            Capability::AssignLeads => &self.can_assign_leads,
            Capability::DeleteLeads => &self.can_delete_leads,
            Capability::ExportLeads => &self.can_export_leads,
            Capability::ViewReports => &self.can_view_reports,
            Capability::ViewAllReports => &self.can_view_all_reports,
            Capability::EditSettings => &self.can_edit_settings,
            Capability::ManageContent => &self.can_manage_content,
        }
    }

    fn slot_mut(&mut self, capability: Capability) -> &mut Option<bool> {
        match capability {
            Capability::ManageUsers => &mut self.can_manage_users,
            Capability::ManageTeams => &mut self.can_manage_teams,
            Capability::ViewAllLeads => &mut self.can_view_all_leads,
            Capability::AssignLeads => &mut self.can_assign_leads,
            Capability::DeleteLeads => &mut self.can_delete_leads,
            Capability::ExportLeads => &mut self.can_export_leads,
            Capability::ViewReports => &mut self.can_view_reports,
            Capability::ViewAllReports => &mut self.can_view_all_reports,
            Capability::EditSettings => &mut self.can_edit_settings,
            Capability::ManageContent => &mut self.can_manage_content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// The current actor, passed explicitly to every evaluator call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(default)]
    pub id: String,
    /// Mongo-style id; the backend sends it next to `id` on some endpoints.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamRef>,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            object_id: None,
            name: String::new(),
            email: String::new(),
            role,
            permissions: Permissions::default(),
            team: None,
        }
    }

    #[must_use]
    pub fn with_flag(mut self, capability: Capability, value: bool) -> Self {
        self.permissions.set(capability, Some(value));
        self
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Stable identifier, preferring `id` over `_id`.
    pub fn identifier(&self) -> &str {
        if !self.id.is_empty() {
            return &self.id;
        }
        self.object_id.as_deref().unwrap_or_default()
    }
}
