//! HR vertical slice.
//!
//! Records, store seams and the services behind the `/employee` and
//! `/compensation` endpoints. Persistence lives behind [`EmployeeStore`] and
//! [`CompensationStore`]; `platform-db` provides the sea-orm backed versions and
//! [`memory`] keeps everything in process.

pub mod compensation;
pub mod employees;
pub mod error;
pub mod memory;
pub mod model;
pub mod reporting;
pub mod store;

pub use compensation::CompensationService;
pub use employees::EmployeeService;
pub use error::{HrError, HrResult};
pub use model::{
    Compensation, CompensationDraft, Employee, EmployeeDraft, EmployeeRef, EmployeeRefDraft,
    ReportingStructure,
};
pub use reporting::ReportingStructureResolver;
pub use store::{CompensationStore, EmployeeStore, StoreError, StoreResult};
