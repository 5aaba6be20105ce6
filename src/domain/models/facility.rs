use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::error::AppError;

pub const MAX_FACILITY_NAME_LEN: usize = 10;

/// A shared bookable resource. `amount` is how many bookings may overlap on any day.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub amount: i32,
}

#[derive(Debug, Clone)]
pub struct NewFacility {
    pub name: String,
    pub amount: i32,
}

impl NewFacility {
    pub fn new(name: &str, amount: i32) -> Result<Self, AppError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_FACILITY_NAME_LEN {
            return Err(AppError::Validation(format!(
                "Facility name must be between 1 and {} characters",
                MAX_FACILITY_NAME_LEN
            )));
        }
        if amount <= 0 {
            return Err(AppError::Validation("Facility amount must be positive".into()));
        }
        Ok(Self { name: name.to_string(), amount })
    }
}
