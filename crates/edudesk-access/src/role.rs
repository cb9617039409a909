use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;

/// Roles known to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Superadmin,
    Admin,
    SalesManager,
    TeamLead,
    Sales,
    Support,
    Instructor,
    Student,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Superadmin,
        Role::Admin,
        Role::SalesManager,
        Role::TeamLead,
        Role::Sales,
        Role::Support,
        Role::Instructor,
        Role::Student,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::SalesManager => "sales-manager",
            Role::TeamLead => "team-lead",
            Role::Sales => "sales",
            Role::Support => "support",
            Role::Instructor => "instructor",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AccessError::UnknownRole(s.to_string()))
    }
}
