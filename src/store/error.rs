use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("employee `{0}` already exists")]
    DuplicateEmployee(String),

    #[error("employee `{0}` not found")]
    EmployeeNotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid stored document: {0}")]
    InvalidDocument(String),

    #[error("write did not complete: {0}")]
    Interrupted(String),
}
