use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, instrument};

use crate::{
    error::{HrError, HrResult},
    model::{Compensation, CompensationDraft, EmployeeRef},
    store::{CompensationStore, StoreError},
};

#[derive(Clone)]
pub struct CompensationService {
    store: Arc<dyn CompensationStore>,
}

impl CompensationService {
    pub fn new(store: Arc<dyn CompensationStore>) -> Self {
        Self { store }
    }

    /// Record compensation for an employee.
    ///
    /// Each employee has at most one record: when one exists it is returned
    /// untouched and `draft` is discarded without validating its salary. The
    /// salary must be finite and non-negative only when a new record is
    /// inserted. A missing effective date defaults to today's local date.
    pub async fn create(&self, draft: CompensationDraft) -> HrResult<Compensation> {
        self.create_effective(draft, Local::now().date_naive()).await
    }

    #[instrument(name = "hr.compensation.create", skip_all)]
    async fn create_effective(
        &self,
        draft: CompensationDraft,
        today: NaiveDate,
    ) -> HrResult<Compensation> {
        let employee_id = draft
            .employee_id()
            .ok_or_else(|| HrError::invalid("no employee provided for compensation"))?
            .to_string();

        if let Some(existing) = self.store.find_by_employee(&employee_id).await? {
            debug!(%employee_id, "compensation already exists");
            return Ok(existing);
        }
        if !draft.salary.is_finite() || draft.salary < 0.0 {
            return Err(HrError::invalid("salary must be a non-negative number"));
        }

        let compensation = Compensation {
            employee: EmployeeRef::new(employee_id),
            salary: draft.salary,
            effective_date: draft.effective_date.unwrap_or(today),
        };
        match self.store.insert(&compensation).await {
            Ok(()) => Ok(compensation),
            // lost a race with a concurrent create; theirs wins
            Err(StoreError::Conflict) => self
                .store
                .find_by_employee(&compensation.employee.employee_id)
                .await?
                .ok_or_else(|| StoreError::Conflict.into()),
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(name = "hr.compensation.read", skip(self))]
    pub async fn read(&self, employee_id: &str) -> HrResult<Option<Compensation>> {
        Ok(self.store.find_by_employee(employee_id).await?)
    }
}
