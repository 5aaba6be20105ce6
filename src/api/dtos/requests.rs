use chrono::{DateTime, Datelike, NaiveDate};
use serde::Deserialize;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct EmployeeRequest {
    pub fullname: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateFacilityRequest {
    pub name: String,
    pub amount: i32,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    #[serde(alias = "FacilityId")]
    pub facility_id: Option<i64>,
    pub start_booking: Option<String>,
    pub end_booking: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    #[serde(alias = "FacilityId")]
    pub facility_id: Option<i64>,
    pub start_booking: Option<String>,
    pub end_booking: Option<String>,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub start: String,
    pub end: String,
    pub exclude: Option<i64>,
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, keeping only its calendar day.
///
/// Years are limited to 0000..=9999: dates are stored as text, and signed or
/// five-digit years would break the lexical range comparison.
pub fn parse_day(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    let day = if value.contains('T') {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.date_naive())
            .map_err(|_| AppError::Validation(format!("Invalid {} timestamp", field)))?
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| AppError::Validation(format!("Invalid {} date format (YYYY-MM-DD)", field)))?
    };

    if !(0..=9999).contains(&day.year()) {
        return Err(AppError::Validation(format!("{} year must be between 0000 and 9999", field)));
    }
    Ok(day)
}
