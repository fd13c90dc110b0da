pub mod admin;
pub mod attendance;
pub mod employee;
pub mod live;
pub mod views;

use actix_web::HttpResponse;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use utoipa::IntoParams;

use crate::model::ValidationErrors;
use crate::store::StoreError;

/// Today on the server's local calendar, which is what attendance is marked against.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    /// Day to show, `YYYY-MM-DD`. Defaults to today.
    #[param(example = "2024-01-15", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
}

impl DateQuery {
    pub fn day(&self) -> NaiveDate {
        self.date.unwrap_or_else(today)
    }
}

pub(crate) fn validation_failed(errors: &ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "message": "Validation failed",
        "errors": errors.fields(),
    }))
}

/// Maps a store failure onto the notification body the views show.
pub(crate) fn store_failed(e: &StoreError, fallback: &str) -> HttpResponse {
    match e {
        StoreError::DuplicateEmployee(id) => HttpResponse::Conflict().json(json!({
            "message": format!("Employee ID {id} already exists")
        })),
        StoreError::EmployeeNotFound(id) => HttpResponse::NotFound().json(json!({
            "message": format!("Employee {id} not found")
        })),
        other => {
            error!(error = %other, "Store operation failed");
            HttpResponse::InternalServerError().json(json!({ "message": fallback }))
        }
    }
}
