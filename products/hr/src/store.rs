//! Persistence seams for the HR slice.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Compensation, Employee};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with the same key already exists.
    #[error("record already exists")]
    Conflict,
    #[error("store backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find(&self, employee_id: &str) -> StoreResult<Option<Employee>>;

    /// Fetch every employee whose id appears in `employee_ids`. Unknown ids are
    /// left out of the result; order is unspecified.
    async fn find_many(&self, employee_ids: &[String]) -> StoreResult<Vec<Employee>>;

    async fn insert(&self, employee: &Employee) -> StoreResult<()>;

    /// Replace the stored record with the same id. Returns `false` when there
    /// is nothing to replace.
    async fn replace(&self, employee: &Employee) -> StoreResult<bool>;
}

#[async_trait]
pub trait CompensationStore: Send + Sync {
    async fn find_by_employee(&self, employee_id: &str) -> StoreResult<Option<Compensation>>;

    /// Fails with [`StoreError::Conflict`] when the employee already has a
    /// compensation record.
    async fn insert(&self, compensation: &Compensation) -> StoreResult<()>;
}
