use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info};
use utoipa::ToSchema;

use super::{DateQuery, store_failed, today, validation_failed};
use crate::auth::session::Session;
use crate::model::attendance::{Attendance, AttendanceEntry, DATE_FORMAT, MarkAttendance};
use crate::service::ledger::enrich;
use crate::service::{AttendanceLedger, EmployeeRegistry};

#[derive(Serialize, ToSchema)]
pub struct MarkAttendanceResponse {
    #[schema(example = "Marked Present for E001 on 2024-01-15")]
    pub message: String,
    pub record: Attendance,
}

#[derive(Serialize, ToSchema)]
pub struct DailyAttendanceResponse {
    #[schema(example = "2024-01-15", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub records: Vec<AttendanceEntry>,
}

/// Loads one day's log and joins it to employee names.
pub(crate) async fn daily_entries(
    registry: &EmployeeRegistry,
    ledger: &AttendanceLedger,
    date: NaiveDate,
) -> actix_web::Result<Vec<AttendanceEntry>> {
    let (records, employees) = futures::try_join!(
        ledger.list_attendance_for_date(date),
        registry.list_employees()
    )
    .map_err(|e| {
        error!(error = %e, %date, "Failed to load attendance");
        ErrorInternalServerError("Database error")
    })?;

    Ok(enrich(&records, &employees))
}

/// Mark attendance
///
/// One record per employee per day; marking the same day again replaces the status.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 200, description = "Attendance recorded", body = MarkAttendanceResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Employee not found (memory store only)", body = Object, example = json!({
            "message": "Employee E404 not found"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Failed to record attendance."
        }))
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_attendance(
    session: Session,
    ledger: web::Data<AttendanceLedger>,
    payload: web::Json<MarkAttendance>,
) -> impl Responder {
    let MarkAttendance {
        employee_id,
        date,
        status,
    } = payload.into_inner();
    let date = date.unwrap_or_else(today);

    let ticket = match ledger.mark_attendance(&employee_id, date, status) {
        Ok(ticket) => ticket,
        Err(errors) => return validation_failed(&errors),
    };

    match ticket.wait().await {
        Ok(record) => {
            info!(session = %session.session_id, key = %record.id, %status, "Attendance marked");
            HttpResponse::Ok().json(MarkAttendanceResponse {
                message: format!(
                    "Marked {} for {} on {}",
                    record.status,
                    record.employee_id,
                    record.date.format(DATE_FORMAT)
                ),
                record,
            })
        }
        Err(e) => store_failed(&e, "Failed to record attendance."),
    }
}

/// Attendance for one day
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(DateQuery),
    responses(
        (status = 200, description = "Records for the day, with employee names", body = DailyAttendanceResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_attendance(
    registry: web::Data<EmployeeRegistry>,
    ledger: web::Data<AttendanceLedger>,
    query: web::Query<DateQuery>,
) -> actix_web::Result<impl Responder> {
    let date = query.day();
    let records = daily_entries(&registry, &ledger, date).await?;
    debug!(%date, count = records.len(), "Listed attendance");

    Ok(HttpResponse::Ok().json(DailyAttendanceResponse { date, records }))
}
