use anyhow::Result;
use products_hr::{Employee, EmployeeDraft, EmployeeRefDraft, EmployeeService};
use tracing::info;

/// Insert the demo org chart and return its root, John Lennon.
///
/// ```text
/// John Lennon
/// ├── Paul McCartney
/// └── Ringo Starr
///     ├── Pete Best
///     └── George Harrison
/// ```
pub async fn seed_demo_org(employees: &EmployeeService) -> Result<Employee> {
    let pete = employees
        .create(draft("Pete", "Best", "Developer II", &[]))
        .await?;
    let george = employees
        .create(draft("George", "Harrison", "Developer III", &[]))
        .await?;
    let paul = employees
        .create(draft("Paul", "McCartney", "Developer I", &[]))
        .await?;
    let ringo = employees
        .create(draft("Ringo", "Starr", "Developer V", &[&pete, &george]))
        .await?;
    let john = employees
        .create(draft("John", "Lennon", "Development Manager", &[&paul, &ringo]))
        .await?;
    info!(root = %john.employee_id, "seeded demo org chart");
    Ok(john)
}

fn draft(first: &str, last: &str, position: &str, reports: &[&Employee]) -> EmployeeDraft {
    EmployeeDraft {
        first_name: first.into(),
        last_name: last.into(),
        position: position.into(),
        department: "Engineering".into(),
        direct_reports: reports
            .iter()
            .map(|e| EmployeeRefDraft {
                employee_id: Some(e.employee_id.clone()),
            })
            .collect(),
    }
}
