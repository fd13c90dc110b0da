use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Rules, ValidationErrors};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// Returns true when `value` looks like `local@domain.tld`.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "E001",
        "full_name": "Alice Johnson",
        "email": "alice.j@company.com",
        "department": "Engineering",
        "created_at": "2024-01-15T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = "E001")]
    pub employee_id: String,

    #[schema(example = "Alice Johnson")]
    pub full_name: String,

    #[schema(example = "alice.j@company.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "2024-01-15T09:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Materializes a validated form as a stored document created at `now`.
    pub fn from_new(input: NewEmployee, now: DateTime<Utc>) -> Self {
        Self {
            employee_id: input.employee_id,
            full_name: input.full_name,
            email: input.email,
            department: input.department,
            created_at: now,
        }
    }

    /// Shallow merge-write: every field of `input` overwrites, `created_at` survives.
    pub fn merge(&mut self, input: NewEmployee) {
        self.full_name = input.full_name;
        self.email = input.email;
        self.department = input.department;
    }
}

/// The "add employee" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewEmployee {
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "Alice Johnson")]
    pub full_name: String,
    #[schema(example = "alice.j@company.com", format = "email")]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
}

impl NewEmployee {
    pub fn new(
        employee_id: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            full_name: full_name.into(),
            email: email.into(),
            department: department.into(),
        }
    }

    /// Trims every field and applies the form rules.
    pub fn validated(self) -> Result<Self, ValidationErrors> {
        let input = Self {
            employee_id: self.employee_id.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            department: self.department.trim().to_string(),
        };

        let mut rules = Rules::default();
        rules.require("employee_id", &input.employee_id, "Employee ID is required");
        rules.require("full_name", &input.full_name, "Full name is required");
        rules.check("email", is_valid_email(&input.email), "Invalid email format");
        rules.require("department", &input.department, "Department is required");
        rules.finish()?;

        Ok(input)
    }
}

/// Partial update body for `PUT /employees/{id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmployeePatch {
    #[schema(example = "Alice Johnson")]
    pub full_name: Option<String>,
    #[schema(example = "alice.j@company.com", format = "email")]
    pub email: Option<String>,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
}

impl EmployeePatch {
    /// Fills unspecified fields from `existing`, so the write preserves them.
    /// With no existing document the missing fields stay empty and fail validation.
    pub fn onto(self, employee_id: &str, existing: Option<&Employee>) -> NewEmployee {
        fn pick(update: Option<String>, current: Option<&String>) -> String {
            update.or_else(|| current.cloned()).unwrap_or_default()
        }

        NewEmployee {
            employee_id: employee_id.to_string(),
            full_name: pick(self.full_name, existing.map(|e| &e.full_name)),
            email: pick(self.email, existing.map(|e| &e.email)),
            department: pick(self.department, existing.map(|e| &e.department)),
        }
    }
}
