use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::domain::models::request::BookingRequest;
use crate::error::AppError;

pub const MAX_FULLNAME_LEN: usize = 64;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: i64,
    pub fullname: String,
}

/// Employee together with their booking requests, earliest start first.
#[derive(Debug, Serialize)]
pub struct EmployeeDetails {
    #[serde(flatten)]
    pub employee: Employee,
    pub requests: Vec<BookingRequest>,
}

/// Trims the name and checks it fits the `employees.fullname` column.
pub fn normalize_fullname(raw: &str) -> Result<String, AppError> {
    let fullname = raw.trim();
    if fullname.is_empty() {
        return Err(AppError::Validation("fullname must not be empty".into()));
    }
    if fullname.chars().count() > MAX_FULLNAME_LEN {
        return Err(AppError::Validation(format!("fullname must be at most {} characters", MAX_FULLNAME_LEN)));
    }
    Ok(fullname.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullname_is_trimmed() {
        assert_eq!(normalize_fullname("  Ada Lovelace ").unwrap(), "Ada Lovelace");
    }

    #[test]
    fn test_fullname_limits() {
        assert!(normalize_fullname("   ").is_err());
        assert!(normalize_fullname(&"x".repeat(MAX_FULLNAME_LEN)).is_ok());
        assert!(normalize_fullname(&"x".repeat(MAX_FULLNAME_LEN + 1)).is_err());
    }
}
