use std::fmt;
use serde::Serialize;
use crate::domain::models::facility::Facility;
use crate::domain::models::request::{BookingRequest, BookingWindow};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Admit,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub overlapping: i64,
    pub capacity: i32,
    pub decision: Decision,
}

/// Details of a rejected candidate: how many stored bookings overlapped it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapacityConflict {
    pub facility_id: i64,
    pub overlapping: i64,
    pub capacity: i32,
}

impl CapacityConflict {
    pub fn new(facility: &Facility, overlapping: i64) -> Self {
        Self {
            facility_id: facility.id,
            overlapping,
            capacity: facility.amount,
        }
    }
}

impl fmt::Display for CapacityConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Facility {} is unavailable for the selected dates ({} of {} units booked)",
            self.facility_id, self.overlapping, self.capacity
        )
    }
}

/// Outcome of a check-then-write repository call.
#[derive(Debug)]
pub enum Admission<T> {
    Admitted(T),
    Rejected(CapacityConflict),
}

impl<T> Admission<T> {
    pub fn into_result(self) -> Result<T, AppError> {
        match self {
            Admission::Admitted(value) => Ok(value),
            Admission::Rejected(conflict) => Err(AppError::CapacityConflict(conflict)),
        }
    }
}

/// A facility admits a candidate only while fewer than `amount` stored
/// bookings overlap it. Exactly `amount` overlaps is already full.
pub fn decide(overlap_count: i64, facility: &Facility) -> Decision {
    if overlap_count >= i64::from(facility.amount) {
        Decision::Reject
    } else {
        Decision::Admit
    }
}

/// Counts the bookings of `facility_id` overlapping `window`, skipping `exclude_id`.
///
/// Same filter as the repositories' `COUNT(*)` query:
/// `start_booking <= window.end AND end_booking >= window.start`.
pub fn count_overlapping(
    facility_id: i64,
    window: &BookingWindow,
    existing: &[BookingRequest],
    exclude_id: Option<i64>,
) -> i64 {
    existing
        .iter()
        .filter(|r| r.facility_id == facility_id)
        .filter(|r| Some(r.id) != exclude_id)
        .filter(|r| window.overlaps(r.start_booking, r.end_booking))
        .count() as i64
}

pub fn assess(
    facility: &Facility,
    window: &BookingWindow,
    existing: &[BookingRequest],
    exclude_id: Option<i64>,
) -> Assessment {
    let overlapping = count_overlapping(facility.id, window, existing, exclude_id);
    Assessment {
        overlapping,
        capacity: facility.amount,
        decision: decide(overlapping, facility),
    }
}

pub fn admit(
    facility: &Facility,
    window: &BookingWindow,
    existing: &[BookingRequest],
    exclude_id: Option<i64>,
) -> Decision {
    assess(facility, window, existing, exclude_id).decision
}
