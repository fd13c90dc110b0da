//! Directory search and dashboard figures, computed over an already fetched list.
//!
//! Everything here is a linear scan per call. That is fine for the tens to low
//! hundreds of employees a single admin manages.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::employee::Employee;

/// Department filter value meaning "no filter".
pub const ALL_DEPARTMENTS: &str = "all";

/// Case-insensitive substring match on name, id, email or department. The query
/// is used as typed, so an empty query matches everyone and spaces must match too.
pub fn matches_search(employee: &Employee, query: &str) -> bool {
    let query = query.to_lowercase();
    [
        &employee.full_name,
        &employee.employee_id,
        &employee.email,
        &employee.department,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}

/// Exact department equality; `None`, empty and `"all"` match everyone.
pub fn matches_department(employee: &Employee, department: Option<&str>) -> bool {
    match department.map(str::trim) {
        None | Some("") | Some(ALL_DEPARTMENTS) => true,
        Some(department) => employee.department == department,
    }
}

pub fn filter_by_search<'a, I>(employees: I, query: &str) -> Vec<&'a Employee>
where
    I: IntoIterator<Item = &'a Employee>,
{
    employees
        .into_iter()
        .filter(|e| matches_search(e, query))
        .collect()
}

pub fn filter_by_department<'a, I>(employees: I, department: Option<&str>) -> Vec<&'a Employee>
where
    I: IntoIterator<Item = &'a Employee>,
{
    employees
        .into_iter()
        .filter(|e| matches_department(e, department))
        .collect()
}

/// The directory view: both filters at once, original order kept.
pub fn filter_employees<'a>(
    employees: &'a [Employee],
    query: &str,
    department: Option<&str>,
) -> Vec<&'a Employee> {
    employees
        .iter()
        .filter(|e| matches_search(e, query) && matches_department(e, department))
        .collect()
}

/// Distinct department labels, sorted, for the filter dropdown.
pub fn departments(employees: &[Employee]) -> Vec<String> {
    employees
        .iter()
        .map(|e| e.department.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    #[schema(example = 5)]
    pub total_employees: usize,
    #[schema(example = 4)]
    pub departments: usize,
    #[schema(example = "2024-01-15", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = 4)]
    pub present: usize,
    #[schema(example = 1)]
    pub absent: usize,
    /// Employees with no record for `date`.
    #[schema(example = 0)]
    pub unmarked: usize,
}

pub fn dashboard_stats(employees: &[Employee], attendance: &[Attendance], date: NaiveDate) -> DashboardStats {
    let on_date: Vec<&Attendance> = attendance.iter().filter(|a| a.date == date).collect();
    let count = |status: AttendanceStatus| on_date.iter().filter(|a| a.status == status).count();

    let marked: BTreeSet<&str> = on_date.iter().map(|a| a.employee_id.as_str()).collect();
    let unmarked = employees
        .iter()
        .filter(|e| !marked.contains(e.employee_id.as_str()))
        .count();

    DashboardStats {
        total_employees: employees.len(),
        departments: departments(employees).len(),
        date,
        present: count(AttendanceStatus::Present),
        absent: count(AttendanceStatus::Absent),
        unmarked,
    }
}
