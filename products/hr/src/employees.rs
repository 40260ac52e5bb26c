use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    model::{Employee, EmployeeDraft, ReportingStructure},
    reporting::ReportingStructureResolver,
    store::EmployeeStore,
};

#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
    resolver: ReportingStructureResolver,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        let resolver = ReportingStructureResolver::new(store.clone());
        Self { store, resolver }
    }

    /// Persist a new employee under a freshly generated id.
    #[instrument(name = "hr.employee.create", skip_all)]
    pub async fn create(&self, draft: EmployeeDraft) -> HrResult<Employee> {
        let employee = Employee::from_draft(Uuid::new_v4().to_string(), draft)?;
        debug!(employee_id = %employee.employee_id, "creating employee");
        self.store.insert(&employee).await?;
        Ok(employee)
    }

    #[instrument(name = "hr.employee.read", skip(self))]
    pub async fn read(&self, employee_id: &str) -> HrResult<Employee> {
        self.store
            .find(employee_id)
            .await?
            .ok_or_else(|| HrError::NotFound(employee_id.to_string()))
    }

    /// Replace every field of an existing employee. Updates never create
    /// records, so an unknown id is reported as not found.
    #[instrument(name = "hr.employee.update", skip(self, draft))]
    pub async fn update(&self, employee_id: &str, draft: EmployeeDraft) -> HrResult<Employee> {
        let employee = Employee::from_draft(employee_id, draft)?;
        if !self.store.replace(&employee).await? {
            return Err(HrError::NotFound(employee_id.to_string()));
        }
        Ok(employee)
    }

    pub async fn reporting_structure(
        &self,
        employee_id: &str,
    ) -> HrResult<Option<ReportingStructure>> {
        self.resolver.resolve(employee_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{memory::InMemoryEmployeeStore, model::EmployeeRefDraft};

    fn service() -> EmployeeService {
        EmployeeService::new(Arc::new(InMemoryEmployeeStore::new()))
    }

    fn draft(first: &str, last: &str, reports: &[&Employee]) -> EmployeeDraft {
        EmployeeDraft {
            first_name: first.into(),
            last_name: last.into(),
            position: "Developer".into(),
            department: "Engineering".into(),
            direct_reports: reports
                .iter()
                .map(|e| EmployeeRefDraft {
                    employee_id: Some(e.employee_id.clone()),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn create_read_update() {
        let service = service();
        let created = service.create(draft("John", "Doe", &[])).await.unwrap();
        assert!(!created.employee_id.is_empty());

        let read = service.read(&created.employee_id).await.unwrap();
        assert_eq!(read, created);

        let mut changes = EmployeeDraft::from(read);
        changes.position = "Development Manager".into();
        let updated = service.update(&created.employee_id, changes).await.unwrap();
        assert_eq!(updated.position, "Development Manager");
        assert_eq!(updated.employee_id, created.employee_id);
        assert_eq!(
            service.read(&created.employee_id).await.unwrap().position,
            "Development Manager"
        );
    }

    #[tokio::test]
    async fn create_assigns_distinct_ids() {
        let service = service();
        let a = service.create(draft("A", "One", &[])).await.unwrap();
        let b = service.create(draft("A", "One", &[])).await.unwrap();
        assert_ne!(a.employee_id, b.employee_id);
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let err = service().read("invalid id").await.unwrap_err();
        assert!(matches!(err, HrError::NotFound(id) if id == "invalid id"));
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let err = service()
            .update("nobody", draft("No", "Body", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::NotFound(_)));
    }

    #[tokio::test]
    async fn reporting_structure_through_created_employees() {
        let service = service();
        let report1 = service.create(draft("Report", "1", &[])).await.unwrap();
        let report2 = service.create(draft("Report", "2", &[&report1])).await.unwrap();
        let report3 = service.create(draft("Report", "3", &[&report1])).await.unwrap();
        let boss = service
            .create(draft("Bobby", "Employee", &[&report1, &report2, &report3]))
            .await
            .unwrap();

        let structure = service
            .reporting_structure(&boss.employee_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(structure.number_of_reports, 3);
        assert_eq!(structure.employee, boss);
        assert!(service.reporting_structure("invalid id").await.unwrap().is_none());
    }
}
