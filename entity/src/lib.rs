pub mod compensations;
pub mod direct_reports;
pub mod employees;
