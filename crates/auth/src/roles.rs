use core::str::FromStr;

use serde::{Deserialize, Serialize};

use roster_core::DomainError;

/// Role used for access decisions.
///
/// Variants are declared from least to most privileged, so the derived
/// `Ord` is the privilege order `employee < manager < admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Least privilege; the fallback when nothing else is known.
    #[default]
    Employee,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Employee, Role::Manager, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Whether holding `self` satisfies a requirement for `required`.
    ///
    /// Equal-or-greater privilege satisfies; this is not a membership check.
    pub fn satisfies(self, required: Role) -> bool {
        self >= required
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::unknown("role", other)),
        }
    }
}
