use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::model::ValidationErrors;
use crate::model::attendance::{
    Attendance, AttendanceEntry, AttendanceStatus, AttendanceWrite, UNKNOWN_EMPLOYEE,
};
use crate::model::employee::Employee;
use crate::store::{Collection, DocumentStore, StoreResult, Subscription};

use super::WriteTicket;

/// Daily attendance, one document per employee per day.
#[derive(Clone)]
pub struct AttendanceLedger {
    store: Arc<dyn DocumentStore>,
}

impl AttendanceLedger {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Starts a merge-write under `employee_id_date`; marking the same day again
    /// replaces the status.
    pub fn mark_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<WriteTicket<Attendance>, ValidationErrors> {
        let write = AttendanceWrite::new(employee_id, date, status).validated()?;
        let store = self.store.clone();
        Ok(WriteTicket::spawn("mark_attendance", write.key(), async move {
            store.put_attendance(write).await
        }))
    }

    pub async fn list_attendance_for_date(&self, date: NaiveDate) -> StoreResult<Vec<Attendance>> {
        self.store.attendance_for_date(date).await
    }

    pub async fn list_attendance_for_employee(&self, employee_id: &str) -> StoreResult<Vec<Attendance>> {
        self.store.attendance_for_employee(employee_id).await
    }

    /// Live attendance for one day. Records are not joined to employees.
    pub fn subscribe_attendance_for_date<C>(&self, date: NaiveDate, deliver: C) -> Subscription
    where
        C: FnMut(StoreResult<Vec<Attendance>>) + Send + 'static,
    {
        let store = self.store.clone();
        self.store.feed().subscribe(
            Collection::Attendance,
            move || {
                let store = store.clone();
                async move { store.attendance_for_date(date).await }
            },
            deliver,
        )
    }
}

/// Joins records to employee names. Records whose employee is missing from
/// `employees` (deleted, or not loaded yet) get [`UNKNOWN_EMPLOYEE`].
pub fn enrich(records: &[Attendance], employees: &[Employee]) -> Vec<AttendanceEntry> {
    let names: HashMap<&str, &str> = employees
        .iter()
        .map(|e| (e.employee_id.as_str(), e.full_name.as_str()))
        .collect();

    records
        .iter()
        .map(|record| AttendanceEntry {
            id: record.id.clone(),
            employee_id: record.employee_id.clone(),
            full_name: names
                .get(record.employee_id.as_str())
                .copied()
                .unwrap_or(UNKNOWN_EMPLOYEE)
                .to_string(),
            date: record.date,
            status: record.status,
        })
        .collect()
}
