use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};
use utoipa::{IntoParams, ToSchema};

use super::{store_failed, validation_failed};
use crate::auth::session::Session;
use crate::model::attendance::Attendance;
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::service::directory::{departments, filter_employees};
use crate::service::{AttendanceLedger, EmployeeRegistry};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DirectoryQuery {
    /// Case-insensitive match on name, ID, email or department
    pub search: Option<String>,
    /// Exact department, or `all`
    pub department: Option<String>,
}

impl DirectoryQuery {
    pub fn apply<'a>(&self, employees: &'a [Employee]) -> Vec<&'a Employee> {
        filter_employees(
            employees,
            self.search.as_deref().unwrap_or(""),
            self.department.as_deref(),
        )
    }
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    /// Matches after filtering
    #[schema(example = 1)]
    pub total: usize,
    /// Every department in the directory, for the filter dropdown
    #[schema(example = json!(["Design", "Engineering"]))]
    pub departments: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeWriteResponse {
    #[schema(example = "Employee added successfully.")]
    pub message: String,
    pub employee: Employee,
}

/// Add Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created", body = EmployeeWriteResponse),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "message": "Validation failed",
            "errors": [{"field": "email", "message": "Invalid email format"}]
        })),
        (status = 409, description = "Employee ID already taken (memory store only)", body = Object, example = json!({
            "message": "Employee ID E001 already exists"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Something went wrong."
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    session: Session,
    registry: web::Data<EmployeeRegistry>,
    payload: web::Json<NewEmployee>,
) -> impl Responder {
    let ticket = match registry.add_employee(payload.into_inner()) {
        Ok(ticket) => ticket,
        Err(errors) => {
            debug!(%errors, "Rejected employee form");
            return validation_failed(&errors);
        }
    };

    match ticket.wait().await {
        Ok(employee) => {
            info!(session = %session.session_id, employee_id = %employee.employee_id, "Employee added");
            HttpResponse::Created().json(EmployeeWriteResponse {
                message: "Employee added successfully.".to_string(),
                employee,
            })
        }
        Err(e) => store_failed(&e, "Something went wrong."),
    }
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(DirectoryQuery),
    responses(
        (status = 200, description = "Employees ordered by ID, filtered", body = EmployeeListResponse)
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    registry: web::Data<EmployeeRegistry>,
    query: web::Query<DirectoryQuery>,
) -> actix_web::Result<impl Responder> {
    let employees = registry.list_employees().await.map_err(|e| {
        error!(error = %e, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    let data: Vec<Employee> = query.apply(&employees).into_iter().cloned().collect();
    debug!(search = ?query.search, department = ?query.department, matched = data.len(), "Filtered directory");

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        total: data.len(),
        departments: departments(&employees),
        data,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    registry: web::Data<EmployeeRegistry>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let employee = registry.get_employee(&employee_id).await.map_err(|e| {
        error!(error = %e, employee_id = %employee_id, "Failed to fetch employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}

/// Update Employee (merge-write)
///
/// Unspecified fields keep their stored values. Writing an unknown ID creates it,
/// provided every field is supplied.
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = EmployeePatch,
    responses(
        (status = 200, description = "Employee saved", body = EmployeeWriteResponse),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    session: Session,
    registry: web::Data<EmployeeRegistry>,
    path: web::Path<String>,
    body: web::Json<EmployeePatch>,
) -> impl Responder {
    let employee_id = path.into_inner();

    let existing = match registry.get_employee(&employee_id).await {
        Ok(existing) => existing,
        Err(e) => return store_failed(&e, "Something went wrong."),
    };

    let input = body.into_inner().onto(&employee_id, existing.as_ref());
    let ticket = match registry.upsert_employee(input) {
        Ok(ticket) => ticket,
        Err(errors) => return validation_failed(&errors),
    };

    match ticket.wait().await {
        Ok(employee) => {
            info!(session = %session.session_id, employee_id = %employee_id, "Employee saved");
            HttpResponse::Ok().json(EmployeeWriteResponse {
                message: "Employee updated successfully".to_string(),
                employee,
            })
        }
        Err(e) => store_failed(&e, "Something went wrong."),
    }
}

/// Delete Employee
///
/// Acknowledged before the store confirms; a failed delete is only logged.
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 202, description = "Delete issued", body = Object, example = json!({
            "message": "Employee record removed."
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    session: Session,
    registry: web::Data<EmployeeRegistry>,
    path: web::Path<String>,
) -> impl Responder {
    let employee_id = path.into_inner();

    // Fire and forget.
    drop(registry.delete_employee(&employee_id));
    info!(session = %session.session_id, employee_id = %employee_id, "Employee delete issued");

    HttpResponse::Accepted().json(json!({
        "message": "Employee record removed."
    }))
}

/// Attendance history of one employee
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}/attendance",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Records, oldest first", body = [Attendance]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn employee_attendance(
    ledger: web::Data<AttendanceLedger>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let records = ledger
        .list_attendance_for_employee(&employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = %employee_id, "Failed to fetch attendance history");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(records))
}
