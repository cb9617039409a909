use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;

/// A named action that can be gated, independent of how it is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    ManageUsers,
    ManageTeams,
    ViewAllLeads,
    AssignLeads,
    DeleteLeads,
    ExportLeads,
    ViewReports,
    ViewAllReports,
    EditSettings,
    ManageContent,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::ManageUsers,
        Capability::ManageTeams,
        Capability::ViewAllLeads,
        Capability::AssignLeads,
        Capability::DeleteLeads,
        Capability::ExportLeads,
        Capability::ViewReports,
        Capability::ViewAllReports,
        Capability::EditSettings,
        Capability::ManageContent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageUsers => "manage-users",
            Capability::ManageTeams => "manage-teams",
            Capability::ViewAllLeads => "view-all-leads",
            Capability::AssignLeads => "assign-leads",
            Capability::DeleteLeads => "delete-leads",
            Capability::ExportLeads => "export-leads",
            Capability::ViewReports => "view-reports",
            Capability::ViewAllReports => "view-all-reports",
            Capability::EditSettings => "edit-settings",
            Capability::ManageContent => "manage-content",
        }
    }

    /// Name of the explicit flag in the backend's permission object.
    pub fn flag_name(&self) -> &'static str {
        match self {
            Capability::ManageUsers => "canManageUsers",
            Capability::ManageTeams => "canManageTeams",
            Capability::ViewAllLeads => "canViewAllLeads",
            Capability::AssignLeads => "canAssignLeads",
            Capability::DeleteLeads => "canDeleteLeads",
            Capability::ExportLeads => "canExportLeads",
            Capability::ViewReports => "canViewReports",
            Capability::ViewAllReports => "canViewAllReports",
            Capability::EditSettings => "canEditSettings",
            Capability::ManageContent => "canManageContent",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts both the kebab-case name and the backend flag name.
impl FromStr for Capability {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Capability::ALL
            .into_iter()
            .find(|cap| cap.as_str().eq_ignore_ascii_case(s) || cap.flag_name() == s)
            .ok_or_else(|| AccessError::UnknownCapability(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_kebab_and_flag_names() {
        assert_eq!("export-leads".parse::<Capability>().unwrap(), Capability::ExportLeads);
        assert_eq!("canExportLeads".parse::<Capability>().unwrap(), Capability::ExportLeads);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Capability::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Capability::ALL.len());
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!(matches!(
            "launch-rockets".parse::<Capability>(),
            Err(AccessError::UnknownCapability(_))
        ));
    }
}
