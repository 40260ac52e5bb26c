use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{HrError, HrResult};

/// A stored employee. The id is assigned by [`crate::EmployeeService::create`]
/// and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub department: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub direct_reports: Vec<EmployeeRef>,
}

impl Employee {
    pub fn from_draft(employee_id: impl Into<String>, draft: EmployeeDraft) -> HrResult<Self> {
        let direct_reports = draft
            .direct_reports
            .into_iter()
            .map(EmployeeRefDraft::resolve)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| HrError::invalid("direct report is missing an employeeId"))?;
        Ok(Self {
            employee_id: employee_id.into(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            position: draft.position,
            department: draft.department,
            direct_reports,
        })
    }

    pub fn direct_report_ids(&self) -> impl Iterator<Item = &str> {
        self.direct_reports.iter().map(|r| r.employee_id.as_str())
    }
}

/// Reference to another employee by id.
///
/// Clients frequently send whole employee objects where a reference is
/// expected; everything but `employeeId` is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRef {
    pub employee_id: String,
}

impl EmployeeRef {
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
        }
    }
}

/// Client-supplied reference whose id has not been checked yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRefDraft {
    #[serde(default)]
    pub employee_id: Option<String>,
}

impl EmployeeRefDraft {
    fn resolve(self) -> Option<EmployeeRef> {
        self.employee_id.map(EmployeeRef::new)
    }
}

impl From<EmployeeRef> for EmployeeRefDraft {
    fn from(value: EmployeeRef) -> Self {
        Self {
            employee_id: Some(value.employee_id),
        }
    }
}

/// Create / update payload for an employee. A client-supplied `employeeId`
/// is not part of the payload and is dropped on deserialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub direct_reports: Vec<EmployeeRefDraft>,
}

impl From<Employee> for EmployeeDraft {
    fn from(value: Employee) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            position: value.position,
            department: value.department,
            direct_reports: value.direct_reports.into_iter().map(Into::into).collect(),
        }
    }
}

/// Compensation for exactly one employee. At most one exists per employee.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compensation {
    pub employee: EmployeeRef,
    pub salary: f64,
    pub effective_date: NaiveDate,
}

/// Request body for creating compensation. `salary` is validated only when
/// the draft actually becomes a new record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationDraft {
    #[serde(default)]
    pub employee: Option<EmployeeRefDraft>,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
}

impl CompensationDraft {
    /// The referenced employee id, or `None` when either the reference or its
    /// id is missing.
    pub fn employee_id(&self) -> Option<&str> {
        self.employee.as_ref()?.employee_id.as_deref()
    }
}

/// Computed on every request; never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingStructure {
    pub employee: Employee,
    pub number_of_reports: usize,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_treats_null_and_missing_reports_as_empty() {
        let missing: EmployeeDraft =
            serde_json::from_value(json!({"firstName": "Bobby"})).unwrap();
        let null: EmployeeDraft =
            serde_json::from_value(json!({"firstName": "Bobby", "directReports": null})).unwrap();
        assert!(missing.direct_reports.is_empty());
        assert!(null.direct_reports.is_empty());
    }

    #[test]
    fn nested_employee_objects_reduce_to_references() {
        let draft: EmployeeDraft = serde_json::from_value(json!({
            "firstName": "John",
            "directReports": [
                {"employeeId": "a", "firstName": "Paul", "directReports": [{"employeeId": "z"}]}
            ]
        }))
        .unwrap();
        let employee = Employee::from_draft("root", draft).unwrap();
        assert_eq!(employee.direct_reports, vec![EmployeeRef::new("a")]);
    }

    #[test]
    fn report_without_id_is_rejected() {
        let draft: EmployeeDraft =
            serde_json::from_value(json!({"directReports": [{"firstName": "Anon"}]})).unwrap();
        let err = Employee::from_draft("root", draft).unwrap_err();
        assert!(matches!(err, HrError::InvalidInput(_)));
    }

    #[test]
    fn compensation_serializes_camel_case_with_iso_date() {
        let comp = Compensation {
            employee: EmployeeRef::new("e-1"),
            salary: 1000.0,
            effective_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&comp).unwrap(),
            json!({"employee": {"employeeId": "e-1"}, "salary": 1000.0, "effectiveDate": "2024-03-01"})
        );
    }
}
