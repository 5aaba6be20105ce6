use chrono::NaiveDate;
use serde::Serialize;
use crate::domain::models::facility::Facility;
use crate::domain::models::request::BookingRequest;
use crate::domain::services::admission::Decision;

#[derive(Serialize)]
pub struct OkResponse {
    pub message: &'static str,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { message: "Ok" }
    }
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
}

impl CreatedResponse {
    pub fn new(id: i64) -> Self {
        Self { message: "Ok", id }
    }
}

#[derive(Serialize)]
pub struct RequestDetailsResponse {
    #[serde(flatten)]
    pub request: BookingRequest,
    pub facility: Facility,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub facility_id: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub overlapping: i64,
    pub capacity: i32,
    pub admitted: bool,
    pub decision: Decision,
}
