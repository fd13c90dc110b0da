//! Page routes. Each returns the data its page renders; forms on the pages post
//! to the API routes.

use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, get, web};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

use super::admin::stats_for;
use super::attendance::daily_entries;
use super::employee::DirectoryQuery;
use super::{DateQuery, today};
use crate::model::attendance::{AttendanceEntry, AttendanceStatus};
use crate::model::employee::Employee;
use crate::service::directory::{ALL_DEPARTMENTS, DashboardStats, departments};
use crate::service::{AttendanceLedger, EmployeeRegistry};

#[derive(Serialize, ToSchema)]
pub struct AdminView {
    pub stats: DashboardStats,
    pub employees: Vec<Employee>,
}

#[derive(Serialize, ToSchema)]
pub struct DirectoryView {
    #[schema(example = "ali")]
    pub search: String,
    #[schema(example = "all")]
    pub department: String,
    /// `all` first, then every department
    #[schema(example = json!(["all", "Design", "Engineering"]))]
    pub department_options: Vec<String>,
    pub employees: Vec<Employee>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeChoice {
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "Alice Johnson (E001)")]
    pub label: String,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceView {
    #[schema(example = "2024-01-15", value_type = String, format = "date")]
    pub today: NaiveDate,
    #[schema(example = "2024-01-15", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub records: Vec<AttendanceEntry>,
    pub employees: Vec<EmployeeChoice>,
    pub statuses: Vec<AttendanceStatus>,
    /// Shown when `records` is empty
    #[schema(example = "Attendance hasn't been marked for anyone today yet.")]
    pub empty_message: Option<String>,
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "name": "HRMS Lite",
        "description": "Employee directory and daily attendance for a single admin.",
        "pages": ["/admin", "/employees", "/attendance"],
        "session": "/auth/anonymous"
    }))
}

async fn all_employees(registry: &EmployeeRegistry) -> actix_web::Result<Vec<Employee>> {
    registry.list_employees().await.map_err(|e| {
        error!(error = %e, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })
}

/// Admin dashboard page
#[utoipa::path(
    get,
    path = "/admin",
    responses((status = 200, description = "Dashboard page data", body = AdminView)),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
pub async fn admin_page(
    registry: web::Data<EmployeeRegistry>,
    ledger: web::Data<AttendanceLedger>,
) -> actix_web::Result<impl Responder> {
    let stats = stats_for(&registry, &ledger, today()).await?;
    let employees = all_employees(&registry).await?;

    Ok(HttpResponse::Ok().json(AdminView { stats, employees }))
}

/// Employee directory page
#[utoipa::path(
    get,
    path = "/employees",
    params(DirectoryQuery),
    responses((status = 200, description = "Directory page data", body = DirectoryView)),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
pub async fn directory_page(
    registry: web::Data<EmployeeRegistry>,
    query: web::Query<DirectoryQuery>,
) -> actix_web::Result<impl Responder> {
    let employees = all_employees(&registry).await?;

    let mut department_options = vec![ALL_DEPARTMENTS.to_string()];
    department_options.extend(departments(&employees));

    Ok(HttpResponse::Ok().json(DirectoryView {
        search: query.search.clone().unwrap_or_default(),
        department: query
            .department
            .clone()
            .unwrap_or_else(|| ALL_DEPARTMENTS.to_string()),
        department_options,
        employees: query.apply(&employees).into_iter().cloned().collect(),
    }))
}

/// Attendance page
#[utoipa::path(
    get,
    path = "/attendance",
    params(DateQuery),
    responses((status = 200, description = "Attendance page data", body = AttendanceView)),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
pub async fn attendance_page(
    registry: web::Data<EmployeeRegistry>,
    ledger: web::Data<AttendanceLedger>,
    query: web::Query<DateQuery>,
) -> actix_web::Result<impl Responder> {
    let today = today();
    let date = query.day();
    let records = daily_entries(&registry, &ledger, date).await?;
    let employees = all_employees(&registry).await?;

    let empty_message = records.is_empty().then(|| {
        if date == today {
            "Attendance hasn't been marked for anyone today yet.".to_string()
        } else {
            format!("No logs available for {date}.")
        }
    });

    Ok(HttpResponse::Ok().json(AttendanceView {
        today,
        date,
        records,
        employees: employees
            .into_iter()
            .map(|e| EmployeeChoice {
                label: format!("{} ({})", e.full_name, e.employee_id),
                employee_id: e.employee_id,
            })
            .collect(),
        statuses: vec![AttendanceStatus::Present, AttendanceStatus::Absent],
        empty_message,
    }))
}
