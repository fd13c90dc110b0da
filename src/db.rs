use sqlx::MySqlPool;
use tracing::info;

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPool::connect(database_url).await
}

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        employee_id VARCHAR(64) NOT NULL PRIMARY KEY,
        full_name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        department VARCHAR(128) NOT NULL,
        created_at TIMESTAMP(6) NOT NULL
    )
    "#,
    // No foreign key: attendance may outlive its employee.
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id VARCHAR(80) NOT NULL PRIMARY KEY,
        employee_id VARCHAR(64) NOT NULL,
        date DATE NOT NULL,
        status VARCHAR(16) NOT NULL,
        created_at TIMESTAMP(6) NOT NULL,
        INDEX idx_attendance_date (date),
        INDEX idx_attendance_employee (employee_id)
    )
    "#,
];

/// Creates the two collections if they are missing.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}
