pub mod attendance;
pub mod employee;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "email", value_type = String)]
    pub field: &'static str,
    #[schema(example = "Invalid email format", value_type = String)]
    pub message: &'static str,
}

/// Every rule a form submission broke. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", describe(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.message, e.field))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

/// Collects rule failures and turns them into a `Result` at the end.
#[derive(Default)]
pub(crate) struct Rules {
    errors: Vec<FieldError>,
}

impl Rules {
    pub(crate) fn require(&mut self, field: &'static str, value: &str, message: &'static str) {
        if value.trim().is_empty() {
            self.errors.push(FieldError { field, message });
        }
    }

    pub(crate) fn check(&mut self, field: &'static str, ok: bool, message: &'static str) {
        if !ok {
            self.errors.push(FieldError { field, message });
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}
