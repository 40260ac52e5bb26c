//! Process-local stores, used by `serve --in-memory` and the unit tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    model::{Compensation, Employee},
    store::{CompensationStore, EmployeeStore, StoreError, StoreResult},
};

#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    employees: RwLock<HashMap<String, Employee>>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn find(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        Ok(self.employees.read().await.get(employee_id).cloned())
    }

    async fn find_many(&self, employee_ids: &[String]) -> StoreResult<Vec<Employee>> {
        let employees = self.employees.read().await;
        Ok(employee_ids
            .iter()
            .filter_map(|id| employees.get(id).cloned())
            .collect())
    }

    async fn insert(&self, employee: &Employee) -> StoreResult<()> {
        let mut employees = self.employees.write().await;
        if employees.contains_key(&employee.employee_id) {
            return Err(StoreError::Conflict);
        }
        employees.insert(employee.employee_id.clone(), employee.clone());
        Ok(())
    }

    async fn replace(&self, employee: &Employee) -> StoreResult<bool> {
        let mut employees = self.employees.write().await;
        match employees.get_mut(&employee.employee_id) {
            Some(slot) => {
                *slot = employee.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCompensationStore {
    by_employee: RwLock<HashMap<String, Compensation>>,
}

impl InMemoryCompensationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompensationStore for InMemoryCompensationStore {
    async fn find_by_employee(&self, employee_id: &str) -> StoreResult<Option<Compensation>> {
        Ok(self.by_employee.read().await.get(employee_id).cloned())
    }

    async fn insert(&self, compensation: &Compensation) -> StoreResult<()> {
        let mut by_employee = self.by_employee.write().await;
        let key = &compensation.employee.employee_id;
        if by_employee.contains_key(key) {
            return Err(StoreError::Conflict);
        }
        by_employee.insert(key.clone(), compensation.clone());
        Ok(())
    }
}
