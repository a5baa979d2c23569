//! Employee records, drafts and patches.

use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use roster_core::{DomainError, DomainResult, EmployeeId};

/// Employment status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    OnLeave,
    Terminated,
    Probation,
    Inactive,
}

impl EmployeeStatus {
    pub const ALL: [EmployeeStatus; 5] = [
        EmployeeStatus::Active,
        EmployeeStatus::OnLeave,
        EmployeeStatus::Terminated,
        EmployeeStatus::Probation,
        EmployeeStatus::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::OnLeave => "on_leave",
            EmployeeStatus::Terminated => "terminated",
            EmployeeStatus::Probation => "probation",
            EmployeeStatus::Inactive => "inactive",
        }
    }
}

impl core::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmployeeStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| DomainError::unknown("employee status", s))
    }
}

/// Transient copy of an employee record owned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    /// Annual salary in minor currency units.
    pub salary: Option<u64>,
    pub status: EmployeeStatus,
    pub avatar_url: Option<String>,
}

/// Fields for a new employee.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<u64>,
    pub status: EmployeeStatus,
}

impl EmployeeDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            position: position.into(),
            ..Default::default()
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_status(mut self, status: EmployeeStatus) -> Self {
        self.status = status;
        self
    }

    /// Check required fields before anything is sent to the store.
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_email(&self.email)?;
        require_text("position", &self.position)?;
        Ok(())
    }

    /// Trim text fields, lowercase the email and turn blank optionals into `None`.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            position: self.position.trim().to_string(),
            department: blank_to_none(self.department),
            phone: blank_to_none(self.phone),
            ..self
        }
    }

    pub fn into_record(self, id: EmployeeId) -> EmployeeRecord {
        EmployeeRecord {
            id,
            name: self.name,
            email: self.email,
            position: self.position,
            department: self.department,
            phone: self.phone,
            hire_date: self.hire_date,
            salary: self.salary,
            status: self.status,
            avatar_url: None,
        }
    }
}

/// Partial update. `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears the value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub department: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub hire_date: Option<Option<NaiveDate>>,
    pub salary: Option<Option<u64>>,
    pub status: Option<EmployeeStatus>,
    pub avatar_url: Option<Option<String>>,
}

impl EmployeePatch {
    pub fn status(status: EmployeeStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Required fields may be omitted but never blanked.
    pub fn validate(&self) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::validation("nothing to update"));
        }
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(email) = &self.email {
            require_email(email)?;
        }
        if let Some(position) = &self.position {
            require_text("position", position)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, record: &mut EmployeeRecord) {
        if let Some(name) = &self.name {
            record.name = name.trim().to_string();
        }
        if let Some(email) = &self.email {
            record.email = email.trim().to_lowercase();
        }
        if let Some(position) = &self.position {
            record.position = position.trim().to_string();
        }
        if let Some(department) = &self.department {
            record.department = blank_to_none(department.clone());
        }
        if let Some(phone) = &self.phone {
            record.phone = blank_to_none(phone.clone());
        }
        if let Some(hire_date) = self.hire_date {
            record.hire_date = hire_date;
        }
        if let Some(salary) = self.salary {
            record.salary = salary;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(avatar_url) = &self.avatar_url {
            record.avatar_url = avatar_url.clone();
        }
    }
}

fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_email(value: &str) -> DomainResult<()> {
    require_text("email", value)?;
    if !value.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
