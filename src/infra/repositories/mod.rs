pub mod sqlite_employee_repo;
pub mod sqlite_facility_repo;
pub mod sqlite_request_repo;

pub mod postgres_employee_repo;
pub mod postgres_facility_repo;
pub mod postgres_request_repo;
