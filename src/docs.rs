use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::admin::SeedResponse;
use crate::api::attendance::{DailyAttendanceResponse, MarkAttendanceResponse};
use crate::api::employee::{EmployeeListResponse, EmployeeWriteResponse};
use crate::api::views::{AdminView, AttendanceView, DirectoryView, EmployeeChoice};
use crate::auth::handlers::SessionResponse;
use crate::model::FieldError;
use crate::model::attendance::{Attendance, AttendanceEntry, AttendanceStatus, MarkAttendance};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::service::directory::DashboardStats;
use crate::service::seed::SeedReport;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "0.1.0",
        description = r#"
## HRMS Lite

Employee directory and daily attendance log for a single administrator.

### Key Features
- **Employees**: add, merge-update, search by name/ID/email/department, delete
- **Attendance**: one Present/Absent mark per employee per day; marking again replaces it
- **Dashboard**: headcount, departments and the day's attendance split
- **Live queries**: Server-Sent Events that push the full result on every change

### Session
Call `POST /auth/anonymous` once and send the returned token as
`Authorization: Bearer <token>` on every other route.

### Errors
Failures return `{"message": "..."}`; validation failures add an `errors` array of
`{field, message}`.
"#,
    ),
    paths(
        crate::auth::handlers::anonymous_sign_in,

        crate::api::views::admin_page,
        crate::api::views::directory_page,
        crate::api::views::attendance_page,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::employee_attendance,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance,

        crate::api::live::employees_live,
        crate::api::live::attendance_live,

        crate::api::admin::dashboard,
        crate::api::admin::seed_sample_data
    ),
    components(
        schemas(
            SessionResponse,
            Employee,
            NewEmployee,
            EmployeePatch,
            EmployeeListResponse,
            EmployeeWriteResponse,
            FieldError,
            Attendance,
            AttendanceStatus,
            AttendanceEntry,
            MarkAttendance,
            MarkAttendanceResponse,
            DailyAttendanceResponse,
            DashboardStats,
            SeedReport,
            SeedResponse,
            AdminView,
            DirectoryView,
            EmployeeChoice,
            AttendanceView
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Session", description = "Anonymous session bootstrap"),
        (name = "Pages", description = "Data behind each page"),
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Attendance", description = "Daily attendance APIs"),
        (name = "Admin", description = "Dashboard and sample data"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
