use crate::domain::models::{
    employee::Employee,
    facility::{Facility, NewFacility},
    request::{BookingRequest, NewBookingRequest, RequestChange},
};
use crate::domain::services::admission::Admission;
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(&self, fullname: &str) -> Result<Employee, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, AppError>;
    async fn list_ids(&self) -> Result<Vec<i64>, AppError>;
    async fn rename(&self, id: i64, fullname: &str) -> Result<Employee, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait FacilityRepository: Send + Sync {
    async fn create(&self, facility: &NewFacility) -> Result<Facility, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Facility>, AppError>;
    async fn list_all(&self) -> Result<Vec<Facility>, AppError>;
}

/// Interval store for booking requests.
///
/// `reserve` and `reschedule` run the admission check and the write inside one
/// transaction holding an exclusive lock over the facility, so concurrent
/// callers cannot both squeeze into the last free unit.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<BookingRequest>, AppError>;
    async fn find_for_employee(&self, employee_id: i64, id: i64) -> Result<Option<BookingRequest>, AppError>;
    async fn list_all(&self) -> Result<Vec<BookingRequest>, AppError>;
    async fn list_by_employee(&self, employee_id: i64) -> Result<Vec<BookingRequest>, AppError>;
    async fn list_by_facility(&self, facility_id: i64) -> Result<Vec<BookingRequest>, AppError>;
    async fn reserve(&self, request: &NewBookingRequest) -> Result<Admission<BookingRequest>, AppError>;
    async fn reschedule(&self, id: i64, change: &RequestChange) -> Result<Admission<BookingRequest>, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
    async fn delete_by_employee(&self, employee_id: i64) -> Result<u64, AppError>;
}
