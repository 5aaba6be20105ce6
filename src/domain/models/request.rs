use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::error::AppError;

/// A stored booking: one employee holds one unit of a facility for every day in
/// `[start_booking, end_booking]`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub id: i64,
    pub facility_id: i64,
    pub start_booking: NaiveDate,
    pub end_booking: NaiveDate,
    pub employee_id: i64,
}

/// Closed range of calendar days. Construction rejects `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl BookingWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::Validation("start_booking must not be after end_booking".into()));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Both ends inclusive, so ranges sharing a single day overlap.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && end >= self.start
    }
}

pub struct NewBookingRequest {
    pub facility_id: i64,
    pub employee_id: i64,
    pub window: BookingWindow,
}

/// Target state of an edited request. Fields left out by the client are
/// filled from the stored row before this is built.
pub struct RequestChange {
    pub facility_id: i64,
    pub window: BookingWindow,
}
