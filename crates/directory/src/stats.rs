//! Headcount statistics for the dashboard.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{DepartmentStore, EmployeeStatus, EmployeeSummary, RosterError, RosterStore};

/// Bucket for employees without a department.
pub const UNASSIGNED_DEPARTMENT: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    pub total: u64,
    pub active: u64,
    pub on_leave: u64,
    pub departments: u64,
    pub by_department: BTreeMap<String, u64>,
    pub by_status: BTreeMap<EmployeeStatus, u64>,
}

impl RosterStats {
    pub fn compute(summaries: &[EmployeeSummary], departments: u64) -> Self {
        let mut stats = Self {
            departments,
            ..Default::default()
        };
        for summary in summaries {
            stats.total += 1;
            match summary.status {
                EmployeeStatus::Active => stats.active += 1,
                EmployeeStatus::OnLeave => stats.on_leave += 1,
                _ => {}
            }
            let department = summary
                .department
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(UNASSIGNED_DEPARTMENT);
            *stats.by_department.entry(department.to_string()).or_default() += 1;
            *stats.by_status.entry(summary.status).or_default() += 1;
        }
        stats
    }

    /// Fetch summaries and departments concurrently and compute.
    pub async fn load(roster: &dyn RosterStore, departments: &dyn DepartmentStore) -> Result<Self, RosterError> {
        let (summaries, departments) = tokio::join!(roster.summaries(), departments.list());
        let summaries = summaries.map_err(RosterError::Query)?;
        let departments = departments.map_err(RosterError::Query)?;
        Ok(Self::compute(&summaries, departments.len() as u64))
    }
}
