use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{ChangeFeed, Collection, DocumentStore, StoreError, StoreResult};
use crate::model::attendance::{Attendance, AttendanceWrite};
use crate::model::employee::{Employee, NewEmployee};

#[derive(Default)]
struct Documents {
    employees: BTreeMap<String, Employee>,
    attendance: BTreeMap<String, Attendance>,
}

/// Process-local store. Construct one per process and share it behind an `Arc`.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Documents>,
    feed: ChangeFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the two starter employees the demo begins with.
    pub fn with_sample_data() -> Self {
        let now = Utc::now();
        let employees = [
            NewEmployee::new("EMP001", "John Doe", "john@example.com", "IT"),
            NewEmployee::new("EMP002", "Jane Smith", "jane@example.com", "HR"),
        ]
        .into_iter()
        .map(|input| (input.employee_id.clone(), Employee::from_new(input, now)))
        .collect();

        Self {
            docs: RwLock::new(Documents {
                employees,
                attendance: BTreeMap::new(),
            }),
            feed: ChangeFeed::new(),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_employee(&self, input: NewEmployee) -> StoreResult<Employee> {
        let employee = {
            let mut docs = self.docs.write().await;
            if docs.employees.contains_key(&input.employee_id) {
                return Err(StoreError::DuplicateEmployee(input.employee_id));
            }
            let employee = Employee::from_new(input, Utc::now());
            docs.employees
                .insert(employee.employee_id.clone(), employee.clone());
            employee
        };

        self.feed.publish(Collection::Employees);
        Ok(employee)
    }

    async fn upsert_employee(&self, input: NewEmployee) -> StoreResult<Employee> {
        let employee = {
            let mut docs = self.docs.write().await;
            match docs.employees.get_mut(&input.employee_id) {
                Some(existing) => {
                    existing.merge(input);
                    existing.clone()
                }
                None => {
                    let employee = Employee::from_new(input, Utc::now());
                    docs.employees
                        .insert(employee.employee_id.clone(), employee.clone());
                    employee
                }
            }
        };

        self.feed.publish(Collection::Employees);
        Ok(employee)
    }

    async fn get_employee(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        Ok(self.docs.read().await.employees.get(employee_id).cloned())
    }

    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.docs.read().await.employees.values().cloned().collect())
    }

    async fn delete_employee(&self, employee_id: &str) -> StoreResult<bool> {
        let (removed, cascaded) = {
            let mut docs = self.docs.write().await;
            let removed = docs.employees.remove(employee_id).is_some();
            let before = docs.attendance.len();
            docs.attendance.retain(|_, a| a.employee_id != employee_id);
            (removed, before - docs.attendance.len())
        };

        debug!(employee_id, removed, cascaded, "Deleted employee from memory store");

        if removed {
            self.feed.publish(Collection::Employees);
        }
        if cascaded > 0 {
            self.feed.publish(Collection::Attendance);
        }
        Ok(removed)
    }

    async fn put_attendance(&self, write: AttendanceWrite) -> StoreResult<Attendance> {
        let record = {
            let mut docs = self.docs.write().await;
            if !docs.employees.contains_key(&write.employee_id) {
                return Err(StoreError::EmployeeNotFound(write.employee_id));
            }

            let key = write.key();
            match docs.attendance.get_mut(&key) {
                Some(existing) => {
                    existing.status = write.status;
                    existing.clone()
                }
                None => {
                    let record = Attendance::from_write(write, Utc::now());
                    docs.attendance.insert(key, record.clone());
                    record
                }
            }
        };

        self.feed.publish(Collection::Attendance);
        Ok(record)
    }

    async fn attendance_for_date(&self, date: NaiveDate) -> StoreResult<Vec<Attendance>> {
        let docs = self.docs.read().await;
        let mut records: Vec<Attendance> = docs
            .attendance
            .values()
            .filter(|a| a.date == date)
            .cloned()
            .collect();
        // Keys sort `E10_` before `E1_`, so order by the id itself.
        records.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(records)
    }

    async fn attendance_for_employee(&self, employee_id: &str) -> StoreResult<Vec<Attendance>> {
        let docs = self.docs.read().await;
        let mut records: Vec<Attendance> = docs
            .attendance
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect();
        records.sort_by_key(|a| a.date);
        Ok(records)
    }

    fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus::{Absent, Present};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn alice() -> NewEmployee {
        NewEmployee::new("E001", "Alice Johnson", "alice.j@company.com", "Engineering")
    }

    #[actix_web::test]
    async fn duplicate_create_is_rejected_and_original_kept() {
        let store = MemoryStore::new();
        store
            .create_employee(NewEmployee::new("EMP1", "First", "first@company.com", "Ops"))
            .await
            .unwrap();

        let err = store
            .create_employee(NewEmployee::new("EMP1", "Second", "second@company.com", "Ops"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateEmployee(id) if id == "EMP1"));
        let kept = store.get_employee("EMP1").await.unwrap().unwrap();
        assert_eq!(kept.full_name, "First");
        assert_eq!(store.list_employees().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn repeated_upserts_leave_one_document() {
        let store = MemoryStore::new();
        let first = store.upsert_employee(alice()).await.unwrap();
        let second = store.upsert_employee(alice()).await.unwrap();

        let all = store.list_employees().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(first.created_at, second.created_at);
    }

    #[actix_web::test]
    async fn list_is_ordered_by_identifier() {
        let store = MemoryStore::new();
        for id in ["E003", "E001", "E002"] {
            store
                .upsert_employee(NewEmployee::new(id, "Name", "n@company.com", "Ops"))
                .await
                .unwrap();
        }

        let ids: Vec<_> = store
            .list_employees()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.employee_id)
            .collect();
        assert_eq!(ids, ["E001", "E002", "E003"]);
    }

    #[actix_web::test]
    async fn remarking_a_day_overwrites_status() {
        let store = MemoryStore::new();
        store.upsert_employee(alice()).await.unwrap();

        store
            .put_attendance(AttendanceWrite::new("E001", day("2024-01-15"), Present))
            .await
            .unwrap();
        store
            .put_attendance(AttendanceWrite::new("E001", day("2024-01-15"), Absent))
            .await
            .unwrap();

        let records = store.attendance_for_date(day("2024-01-15")).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "E001_2024-01-15");
        assert_eq!(records[0].status, Absent);
    }

    #[actix_web::test]
    async fn attendance_requires_known_employee() {
        let store = MemoryStore::new();
        let err = store
            .put_attendance(AttendanceWrite::new("GHOST", day("2024-01-15"), Present))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EmployeeNotFound(_)));
    }

    #[actix_web::test]
    async fn delete_cascades_to_attendance() {
        let store = MemoryStore::new();
        store.upsert_employee(alice()).await.unwrap();
        store
            .upsert_employee(NewEmployee::new("E002", "Robert Smith", "rob.s@company.com", "Design"))
            .await
            .unwrap();
        for id in ["E001", "E002"] {
            store
                .put_attendance(AttendanceWrite::new(id, day("2024-01-15"), Present))
                .await
                .unwrap();
        }

        assert!(store.delete_employee("E001").await.unwrap());
        assert!(!store.delete_employee("E001").await.unwrap());

        assert!(store.get_employee("E001").await.unwrap().is_none());
        assert!(store.attendance_for_employee("E001").await.unwrap().is_empty());
        let left = store.attendance_for_date(day("2024-01-15")).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].employee_id, "E002");
    }

    #[actix_web::test]
    async fn employee_history_is_date_ordered() {
        let store = MemoryStore::new();
        store.upsert_employee(alice()).await.unwrap();
        for d in ["2024-01-17", "2024-01-15", "2024-01-16"] {
            store
                .put_attendance(AttendanceWrite::new("E001", day(d), Present))
                .await
                .unwrap();
        }

        let dates: Vec<_> = store
            .attendance_for_employee("E001")
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.date)
            .collect();
        assert_eq!(dates, [day("2024-01-15"), day("2024-01-16"), day("2024-01-17")]);
    }

    #[test]
    fn sample_data_has_two_employees() {
        let store = MemoryStore::with_sample_data();
        let docs = store.docs.try_read().unwrap();
        assert!(docs.employees.contains_key("EMP001"));
        assert!(docs.employees.contains_key("EMP002"));
    }
}
