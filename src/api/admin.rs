use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use utoipa::ToSchema;

use super::{DateQuery, today};
use crate::auth::session::Session;
use crate::service::directory::{DashboardStats, dashboard_stats};
use crate::service::seed::{self, SeedReport};
use crate::service::{AttendanceLedger, EmployeeRegistry};
use crate::store::DocumentStore;

pub(crate) async fn stats_for(
    registry: &EmployeeRegistry,
    ledger: &AttendanceLedger,
    date: NaiveDate,
) -> actix_web::Result<DashboardStats> {
    let (employees, attendance) = futures::try_join!(
        registry.list_employees(),
        ledger.list_attendance_for_date(date)
    )
    .map_err(|e| {
        error!(error = %e, "Failed to load dashboard data");
        ErrorInternalServerError("Database error")
    })?;

    Ok(dashboard_stats(&employees, &attendance, date))
}

#[derive(Serialize, ToSchema)]
pub struct SeedResponse {
    #[schema(example = "Successfully added 5 employees and today's attendance logs.")]
    pub message: String,
    pub report: SeedReport,
}

/// Headcount, departments and the day's attendance split
#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(DateQuery),
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardStats),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn dashboard(
    registry: web::Data<EmployeeRegistry>,
    ledger: web::Data<AttendanceLedger>,
    query: web::Query<DateQuery>,
) -> actix_web::Result<impl Responder> {
    let stats = stats_for(&registry, &ledger, query.day()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Seed sample data
///
/// Merge-writes five sample employees and a random attendance mark for today,
/// present nine times in ten. Safe to repeat.
#[utoipa::path(
    post,
    path = "/api/admin/seed",
    responses(
        (status = 200, description = "Store seeded", body = SeedResponse),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Seeding failed"
        }))
    ),
    tag = "Admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn seed_sample_data(
    session: Session,
    store: web::Data<dyn DocumentStore>,
) -> impl Responder {
    let plan = seed::plan(today(), &mut rand::thread_rng());

    match seed::apply(store.get_ref(), plan).await {
        Ok(report) => {
            info!(session = %session.session_id, "Database seeded");
            HttpResponse::Ok().json(SeedResponse {
                message: format!(
                    "Successfully added {} employees and today's attendance logs.",
                    report.employees
                ),
                report,
            })
        }
        Err(e) => {
            error!(error = %e, "Seeding failed");
            HttpResponse::InternalServerError().json(json!({
                "message": "Seeding failed"
            }))
        }
    }
}
