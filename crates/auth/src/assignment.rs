//! Role assignments and the non-empty role set governing a user.

use serde::{Deserialize, Serialize};

use roster_core::DepartmentId;

use crate::Role;

/// One role held by a user, optionally scoped to a department.
///
/// A user may hold several assignments at once (e.g. manager of two
/// departments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: Role,
    pub department_id: Option<DepartmentId>,
    pub department_name: Option<String>,
}

impl RoleAssignment {
    /// An unscoped assignment.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            department_id: None,
            department_name: None,
        }
    }

    /// An assignment scoped to one department.
    pub fn in_department(role: Role, department_id: DepartmentId, department_name: impl Into<String>) -> Self {
        Self {
            role,
            department_id: Some(department_id),
            department_name: Some(department_name.into()),
        }
    }

    /// The assignment synthesized when a user has none (least privilege).
    pub fn least_privilege() -> Self {
        Self::new(Role::Employee)
    }
}

/// The resolved, never-empty set of assignments for a user.
///
/// # Invariants
/// - Contains at least one assignment. An empty input collapses to exactly
///   `{employee}`.
/// - No duplicate assignments (first occurrence wins, order preserved).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleSet(Vec<RoleAssignment>);

impl RoleSet {
    pub fn from_assignments(assignments: impl IntoIterator<Item = RoleAssignment>) -> Self {
        let mut unique: Vec<RoleAssignment> = Vec::new();
        for assignment in assignments {
            if !unique.contains(&assignment) {
                unique.push(assignment);
            }
        }

        if unique.is_empty() {
            return Self::least_privilege();
        }

        Self(unique)
    }

    pub fn least_privilege() -> Self {
        Self(vec![RoleAssignment::least_privilege()])
    }

    pub fn assignments(&self) -> &[RoleAssignment] {
        &self.0
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().map(|a| a.role)
    }

    /// The most privileged role held.
    pub fn highest(&self) -> Role {
        self.roles().max().unwrap_or_default()
    }

    /// Whether any assignment has `required` or a more privileged role.
    pub fn has_at_least(&self, required: Role) -> bool {
        self.roles().any(|r| r.satisfies(required))
    }

    /// Literal membership check (no hierarchy).
    pub fn has_exactly(&self, role: Role) -> bool {
        self.roles().any(|r| r == role)
    }

    /// Names of the departments this user manages through scoped manager
    /// assignments.
    pub fn managed_departments(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|a| a.role == Role::Manager)
            .filter_map(|a| a.department_name.as_deref())
            .collect()
    }

    /// Whether the user may manage employees of `department`.
    ///
    /// - admin: any department (including records without one)
    /// - manager: departments named by a manager assignment; an unscoped
    ///   manager assignment covers every department
    /// - employee: none
    pub fn can_manage_department(&self, department: Option<&str>) -> bool {
        if self.has_exactly(Role::Admin) {
            return true;
        }

        self.0.iter().filter(|a| a.role == Role::Manager).any(|a| {
            match (a.department_name.as_deref(), department) {
                (None, _) => true,
                (Some(scope), Some(dept)) => scope.eq_ignore_ascii_case(dept),
                (Some(_), None) => false,
            }
        })
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::least_privilege()
    }
}
