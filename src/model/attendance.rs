use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use super::{Rules, ValidationErrors};

/// Calendar dates travel as `YYYY-MM-DD` everywhere, keys included.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const KEY_SEPARATOR: char = '_';

/// Label shown for attendance rows whose employee document is gone or not loaded yet.
pub const UNKNOWN_EMPLOYEE: &str = "Unknown Employee";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// Document key for one employee on one day: `E001_2024-01-15`.
pub fn attendance_key(employee_id: &str, date: NaiveDate) -> String {
    format!("{employee_id}{KEY_SEPARATOR}{}", date.format(DATE_FORMAT))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": "E001_2024-01-15",
        "employee_id": "E001",
        "date": "2024-01-15",
        "status": "Present",
        "created_at": "2024-01-15T09:00:00Z"
    })
)]
pub struct Attendance {
    #[schema(example = "E001_2024-01-15")]
    pub id: String,
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "2024-01-15", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[schema(example = "2024-01-15T09:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl Attendance {
    pub fn from_write(write: AttendanceWrite, now: DateTime<Utc>) -> Self {
        Self {
            id: write.key(),
            employee_id: write.employee_id,
            date: write.date,
            status: write.status,
            created_at: now,
        }
    }
}

/// Payload of a merge-write into the attendance collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceWrite {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceWrite {
    pub fn new(employee_id: impl Into<String>, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            status,
        }
    }

    pub fn key(&self) -> String {
        attendance_key(&self.employee_id, self.date)
    }

    pub fn validated(self) -> Result<Self, ValidationErrors> {
        let write = Self {
            employee_id: self.employee_id.trim().to_string(),
            ..self
        };

        let mut rules = Rules::default();
        rules.require("employee_id", &write.employee_id, "Employee ID is required");
        rules.finish()?;

        Ok(write)
    }
}

/// Body of `POST /attendance`. `date` defaults to today.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "2024-01-15", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    pub status: AttendanceStatus,
}

/// An attendance record joined with the employee's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceEntry {
    #[schema(example = "E001_2024-01-15")]
    pub id: String,
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "Alice Johnson")]
    pub full_name: String,
    #[schema(example = "2024-01-15", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}
