use async_trait::async_trait;
use entity::compensations;
use products_hr::{Compensation, CompensationStore, EmployeeRef, StoreResult};
use sea_orm::{EntityTrait, Set};
use tracing::instrument;

use crate::{DbPool, backend, employees::conflict_or_backend};

#[derive(Clone, Debug)]
pub struct DbCompensationStore {
    pool: DbPool,
}

impl DbCompensationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompensationStore for DbCompensationStore {
    #[instrument(name = "db.compensation.find", skip(self))]
    async fn find_by_employee(&self, employee_id: &str) -> StoreResult<Option<Compensation>> {
        let model = compensations::Entity::find_by_id(employee_id.to_owned())
            .one(&self.pool)
            .await
            .map_err(backend)?;
        Ok(model.map(|m| Compensation {
            employee: EmployeeRef::new(m.employee_id),
            salary: m.salary,
            effective_date: m.effective_date,
        }))
    }

    #[instrument(
        name = "db.compensation.insert",
        skip_all,
        fields(employee_id = %compensation.employee.employee_id)
    )]
    async fn insert(&self, compensation: &Compensation) -> StoreResult<()> {
        compensations::Entity::insert(compensations::ActiveModel {
            employee_id: Set(compensation.employee.employee_id.clone()),
            salary: Set(compensation.salary),
            effective_date: Set(compensation.effective_date),
        })
        .exec_without_returning(&self.pool)
        .await
        .map_err(conflict_or_backend)?;
        Ok(())
    }
}
