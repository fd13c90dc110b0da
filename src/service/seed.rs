//! Demo data for a fresh store. Development convenience only.

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceStatus, AttendanceWrite};
use crate::model::employee::NewEmployee;
use crate::store::{DocumentStore, StoreResult};

/// Chance that a seeded employee is marked present.
pub const PRESENT_PROBABILITY: f64 = 0.9;

const SAMPLE_EMPLOYEES: [(&str, &str, &str, &str); 5] = [
    ("E001", "Alice Johnson", "alice.j@company.com", "Engineering"),
    ("E002", "Robert Smith", "rob.s@company.com", "Design"),
    ("E003", "Clara Oswald", "clara.o@company.com", "Product"),
    ("E004", "David Tennant", "david.t@company.com", "HR"),
    ("E005", "Rose Tyler", "rose.t@company.com", "Operations"),
];

pub struct SeedPlan {
    pub employees: Vec<NewEmployee>,
    pub attendance: Vec<AttendanceWrite>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SeedReport {
    #[schema(example = 5)]
    pub employees: usize,
    #[schema(example = 4)]
    pub present: usize,
    #[schema(example = 1)]
    pub absent: usize,
}

/// Draws today's statuses up front so the writes need no RNG.
pub fn plan<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> SeedPlan {
    let employees: Vec<NewEmployee> = SAMPLE_EMPLOYEES
        .iter()
        .map(|&(id, name, email, dept)| NewEmployee::new(id, name, email, dept))
        .collect();

    let attendance = employees
        .iter()
        .map(|e| {
            let status = if rng.gen_bool(PRESENT_PROBABILITY) {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            AttendanceWrite::new(e.employee_id.clone(), today, status)
        })
        .collect();

    SeedPlan {
        employees,
        attendance,
    }
}

/// Merge-writes the plan, employees first so attendance always has a parent.
pub async fn apply(store: &dyn DocumentStore, plan: SeedPlan) -> StoreResult<SeedReport> {
    let employees = plan.employees.len();
    for employee in plan.employees {
        store.upsert_employee(employee).await?;
    }

    let mut report = SeedReport {
        employees,
        present: 0,
        absent: 0,
    };
    for write in plan.attendance {
        match store.put_attendance(write).await?.status {
            AttendanceStatus::Present => report.present += 1,
            AttendanceStatus::Absent => report.absent += 1,
        }
    }

    info!(
        employees = report.employees,
        present = report.present,
        absent = report.absent,
        "Store seeded with sample data"
    );
    Ok(report)
}
