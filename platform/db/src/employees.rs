use std::collections::{HashMap, HashSet};

use anyhow::anyhow;
use async_trait::async_trait;
use entity::{direct_reports, employees};
use products_hr::{Employee, EmployeeRef, EmployeeStore, StoreError, StoreResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionTrait,
};
use tracing::instrument;

use crate::{DbPool, backend};

/// Rows per `IN (..)` list or multi-row insert. Keeps every statement well
/// under the bind-parameter limits of SQLite (32766) and Postgres (65535).
const BATCH_SIZE: usize = 1_000;

/// Employees live in `employees`; their direct reports are the ordered rows
/// of `direct_reports` keyed by manager.
#[derive(Clone, Debug)]
pub struct DbEmployeeStore {
    pool: DbPool,
}

impl DbEmployeeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for DbEmployeeStore {
    #[instrument(name = "db.employee.find", skip(self))]
    async fn find(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        let Some(model) = employees::Entity::find_by_id(employee_id.to_owned())
            .one(&self.pool)
            .await
            .map_err(backend)?
        else {
            return Ok(None);
        };
        let reports = direct_reports::Entity::find()
            .filter(direct_reports::Column::ManagerId.eq(employee_id))
            .order_by_asc(direct_reports::Column::Ordinal)
            .all(&self.pool)
            .await
            .map_err(backend)?
            .into_iter()
            .map(|edge| EmployeeRef::new(edge.report_id))
            .collect();
        Ok(Some(assemble(model, reports)))
    }

    #[instrument(name = "db.employee.find_many", skip_all, fields(count = employee_ids.len()))]
    async fn find_many(&self, employee_ids: &[String]) -> StoreResult<Vec<Employee>> {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = employee_ids
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect();

        let mut models = Vec::with_capacity(unique.len());
        let mut edges = Vec::new();
        for batch in unique.chunks(BATCH_SIZE) {
            models.extend(
                employees::Entity::find()
                    .filter(employees::Column::EmployeeId.is_in(batch.iter().copied()))
                    .all(&self.pool)
                    .await
                    .map_err(backend)?,
            );
            edges.extend(
                direct_reports::Entity::find()
                    .filter(direct_reports::Column::ManagerId.is_in(batch.iter().copied()))
                    .order_by_asc(direct_reports::Column::ManagerId)
                    .order_by_asc(direct_reports::Column::Ordinal)
                    .all(&self.pool)
                    .await
                    .map_err(backend)?,
            );
        }

        let mut by_manager: HashMap<String, Vec<EmployeeRef>> = HashMap::new();
        for edge in edges {
            by_manager
                .entry(edge.manager_id)
                .or_default()
                .push(EmployeeRef::new(edge.report_id));
        }
        Ok(models
            .into_iter()
            .map(|model| {
                let reports = by_manager.remove(&model.employee_id).unwrap_or_default();
                assemble(model, reports)
            })
            .collect())
    }

    #[instrument(name = "db.employee.insert", skip_all, fields(employee_id = %employee.employee_id))]
    async fn insert(&self, employee: &Employee) -> StoreResult<()> {
        let edges = edge_models(employee)?;
        let txn = self.pool.begin().await.map_err(backend)?;
        employees::Entity::insert(row(employee))
            .exec_without_returning(&txn)
            .await
            .map_err(conflict_or_backend)?;
        insert_edges(&txn, edges).await.map_err(backend)?;
        txn.commit().await.map_err(backend)
    }

    #[instrument(name = "db.employee.replace", skip_all, fields(employee_id = %employee.employee_id))]
    async fn replace(&self, employee: &Employee) -> StoreResult<bool> {
        let edges = edge_models(employee)?;
        let txn = self.pool.begin().await.map_err(backend)?;
        let updated = employees::Entity::update_many()
            .set(employees::ActiveModel {
                first_name: Set(employee.first_name.clone()),
                last_name: Set(employee.last_name.clone()),
                position: Set(employee.position.clone()),
                department: Set(employee.department.clone()),
                ..Default::default()
            })
            .filter(employees::Column::EmployeeId.eq(employee.employee_id.as_str()))
            .exec(&txn)
            .await
            .map_err(backend)?;
        if updated.rows_affected == 0 {
            txn.rollback().await.map_err(backend)?;
            return Ok(false);
        }
        direct_reports::Entity::delete_many()
            .filter(direct_reports::Column::ManagerId.eq(employee.employee_id.as_str()))
            .exec(&txn)
            .await
            .map_err(backend)?;
        insert_edges(&txn, edges).await.map_err(backend)?;
        txn.commit().await.map_err(backend)?;
        Ok(true)
    }
}

fn assemble(model: employees::Model, direct_reports: Vec<EmployeeRef>) -> Employee {
    Employee {
        employee_id: model.employee_id,
        first_name: model.first_name,
        last_name: model.last_name,
        position: model.position,
        department: model.department,
        direct_reports,
    }
}

fn row(employee: &Employee) -> employees::ActiveModel {
    employees::ActiveModel {
        employee_id: Set(employee.employee_id.clone()),
        first_name: Set(employee.first_name.clone()),
        last_name: Set(employee.last_name.clone()),
        position: Set(employee.position.clone()),
        department: Set(employee.department.clone()),
    }
}

fn edge_models(employee: &Employee) -> StoreResult<Vec<direct_reports::ActiveModel>> {
    employee
        .direct_report_ids()
        .enumerate()
        .map(|(ordinal, report_id)| {
            let ordinal = i32::try_from(ordinal)
                .map_err(|_| StoreError::Backend(anyhow!("too many direct reports")))?;
            Ok(direct_reports::ActiveModel {
                manager_id: Set(employee.employee_id.clone()),
                ordinal: Set(ordinal),
                report_id: Set(report_id.to_owned()),
            })
        })
        .collect()
}

async fn insert_edges<C: ConnectionTrait>(
    conn: &C,
    edges: Vec<direct_reports::ActiveModel>,
) -> Result<(), DbErr> {
    for batch in edges.chunks(BATCH_SIZE) {
        direct_reports::Entity::insert_many(batch.to_vec())
            .exec_without_returning(conn)
            .await?;
    }
    Ok(())
}

pub(crate) fn conflict_or_backend(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Conflict,
        _ => backend(err),
    }
}
