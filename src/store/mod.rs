//! Data-access glue over the document store.
//!
//! Two backends share one contract: [`MemoryStore`] for development and tests and
//! [`MySqlStore`] for a hosted database. They intentionally differ in two places,
//! both inherited from the application they replace:
//!
//! - `create_employee` rejects a taken `employee_id` in memory but merges in MySQL.
//! - `delete_employee` cascades to attendance in memory but leaves orphans in MySQL.

pub mod error;
pub mod feed;
pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::attendance::{Attendance, AttendanceWrite};
use crate::model::employee::{Employee, NewEmployee};

pub use error::{StoreError, StoreResult};
pub use feed::{ChangeFeed, Collection, Subscription};
pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// "Add employee". Duplicate handling is backend specific, see module docs.
    async fn create_employee(&self, input: NewEmployee) -> StoreResult<Employee>;

    /// Merge-write keyed by `employee_id`; `created_at` is kept when the document exists.
    async fn upsert_employee(&self, input: NewEmployee) -> StoreResult<Employee>;

    async fn get_employee(&self, employee_id: &str) -> StoreResult<Option<Employee>>;

    /// All employees ordered by `employee_id` ascending.
    async fn list_employees(&self) -> StoreResult<Vec<Employee>>;

    /// Returns whether a document was removed.
    async fn delete_employee(&self, employee_id: &str) -> StoreResult<bool>;

    /// Merge-write keyed by `employee_id` + date. Later writes win.
    async fn put_attendance(&self, write: AttendanceWrite) -> StoreResult<Attendance>;

    /// Exact date match, ordered by `employee_id`.
    async fn attendance_for_date(&self, date: NaiveDate) -> StoreResult<Vec<Attendance>>;

    /// One employee's history, oldest first.
    async fn attendance_for_employee(&self, employee_id: &str) -> StoreResult<Vec<Attendance>>;

    fn feed(&self) -> &ChangeFeed;
}
