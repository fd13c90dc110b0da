use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, warn};

use super::{ChangeFeed, Collection, DocumentStore, StoreError, StoreResult};
use crate::model::attendance::{Attendance, AttendanceStatus, AttendanceWrite};
use crate::model::employee::{Employee, NewEmployee};

const SELECT_EMPLOYEES: &str = r#"
    SELECT employee_id, full_name, email, department, created_at
    FROM employees
"#;

const SELECT_ATTENDANCE: &str = r#"
    SELECT id, employee_id, date, status, created_at
    FROM attendance
"#;

#[derive(FromRow)]
struct AttendanceRow {
    id: String,
    employee_id: String,
    date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AttendanceRow> for Attendance {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<AttendanceStatus>().map_err(|e: strum::ParseError| {
            StoreError::InvalidDocument(format!("attendance `{}` status `{}`: {e}", row.id, row.status))
        })?;

        Ok(Attendance {
            id: row.id,
            employee_id: row.employee_id,
            date: row.date,
            status,
            created_at: row.created_at,
        })
    }
}

/// Store backed by the hosted MySQL database.
///
/// The database has no change stream, so the feed is driven by this process's own
/// writes; writers in other processes are not observed by live queries.
pub struct MySqlStore {
    pool: MySqlPool,
    feed: ChangeFeed,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            feed: ChangeFeed::new(),
        }
    }

    async fn merge_employee(&self, input: &NewEmployee) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employees (employee_id, full_name, email, department, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                full_name = VALUES(full_name),
                email = VALUES(email),
                department = VALUES(department)
            "#,
        )
        .bind(&input.employee_id)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.department)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_employee(&self, employee_id: &str) -> StoreResult<Employee> {
        self.get_employee(employee_id)
            .await?
            .ok_or_else(|| StoreError::EmployeeNotFound(employee_id.to_string()))
    }

    async fn fetch_attendance(&self, filter: &str, value: &str) -> StoreResult<Vec<Attendance>> {
        let sql = format!("{SELECT_ATTENDANCE} WHERE {filter} = ? ORDER BY employee_id, date");
        debug!(sql = %sql, value, "Fetching attendance");

        sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Attendance::try_from)
            .collect()
    }
}

#[async_trait]
impl DocumentStore for MySqlStore {
    async fn create_employee(&self, input: NewEmployee) -> StoreResult<Employee> {
        // Row counts can't tell an unchanged merge from an insert, so look first.
        if self.get_employee(&input.employee_id).await?.is_some() {
            warn!(
                employee_id = %input.employee_id,
                "Employee id already existed; fields were merged into the existing document"
            );
        }
        self.merge_employee(&input).await?;

        self.feed.publish(Collection::Employees);
        self.fetch_employee(&input.employee_id).await
    }

    async fn upsert_employee(&self, input: NewEmployee) -> StoreResult<Employee> {
        self.merge_employee(&input).await?;
        self.feed.publish(Collection::Employees);
        self.fetch_employee(&input.employee_id).await
    }

    async fn get_employee(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        let sql = format!("{SELECT_EMPLOYEES} WHERE employee_id = ?");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        let sql = format!("{SELECT_EMPLOYEES} ORDER BY employee_id ASC");
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn delete_employee(&self, employee_id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            warn!(
                employee_id,
                "Employee deleted; attendance rows referencing it are kept and will show as unknown"
            );
            self.feed.publish(Collection::Employees);
        }
        Ok(removed)
    }

    async fn put_attendance(&self, write: AttendanceWrite) -> StoreResult<Attendance> {
        let key = write.key();
        sqlx::query(
            r#"
            INSERT INTO attendance (id, employee_id, date, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE status = VALUES(status)
            "#,
        )
        .bind(&key)
        .bind(&write.employee_id)
        .bind(write.date)
        .bind(write.status.as_ref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.feed.publish(Collection::Attendance);

        let sql = format!("{SELECT_ATTENDANCE} WHERE id = ?");
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(&key)
            .fetch_one(&self.pool)
            .await?;
        Attendance::try_from(row)
    }

    async fn attendance_for_date(&self, date: NaiveDate) -> StoreResult<Vec<Attendance>> {
        let date = date.format(crate::model::attendance::DATE_FORMAT).to_string();
        self.fetch_attendance("date", &date).await
    }

    async fn attendance_for_employee(&self, employee_id: &str) -> StoreResult<Vec<Attendance>> {
        self.fetch_attendance("employee_id", employee_id).await
    }

    fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
}
