use crate::domain::models::facility::Facility;
use crate::domain::models::request::{BookingRequest, BookingWindow, NewBookingRequest, RequestChange};
use crate::domain::ports::RequestRepository;
use crate::domain::services::admission::{self, Admission, CapacityConflict, Decision};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

const COLUMNS: &str = "id, facility_id, start_booking, end_booking, employee_id";

pub struct SqliteRequestRepo {
    pool: SqlitePool,
}

impl SqliteRequestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn fetch_facility(conn: &mut SqliteConnection, facility_id: i64) -> Result<Facility, AppError> {
    sqlx::query_as::<_, Facility>("SELECT id, name, amount FROM facilities WHERE id = ?")
        .bind(facility_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Validation("Facility not found".into()))
}

async fn count_overlapping(
    conn: &mut SqliteConnection,
    facility_id: i64,
    window: &BookingWindow,
    exclude_id: Option<i64>,
) -> Result<i64, AppError> {
    // `id IS NOT ?` keeps every row when no id is excluded (NULL binding).
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM requests
         WHERE facility_id = ? AND start_booking <= ? AND end_booking >= ? AND id IS NOT ?"
    )
        .bind(facility_id)
        .bind(window.end())
        .bind(window.start())
        .bind(exclude_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(AppError::Database)
}

#[async_trait]
impl RequestRepository for SqliteRequestRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>(&format!("SELECT {COLUMNS} FROM requests WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_for_employee(&self, employee_id: i64, id: i64) -> Result<Option<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>(&format!("SELECT {COLUMNS} FROM requests WHERE id = ? AND employee_id = ?"))
            .bind(id)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>(&format!("SELECT {COLUMNS} FROM requests ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_employee(&self, employee_id: i64) -> Result<Vec<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>(&format!(
            "SELECT {COLUMNS} FROM requests WHERE employee_id = ? ORDER BY start_booking ASC, id ASC"
        ))
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_facility(&self, facility_id: i64) -> Result<Vec<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>(&format!(
            "SELECT {COLUMNS} FROM requests WHERE facility_id = ? ORDER BY start_booking ASC, id ASC"
        ))
            .bind(facility_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn reserve(&self, request: &NewBookingRequest) -> Result<Admission<BookingRequest>, AppError> {
        // IMMEDIATE takes the write lock before the count, so no other writer
        // can slip a booking in between the check and the insert.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await.map_err(AppError::Database)?;

        let facility = fetch_facility(&mut tx, request.facility_id).await?;
        let overlapping = count_overlapping(&mut tx, facility.id, &request.window, None).await?;

        if admission::decide(overlapping, &facility) == Decision::Reject {
            debug!(facility_id = facility.id, overlapping, capacity = facility.amount, "reservation rejected");
            return Ok(Admission::Rejected(CapacityConflict::new(&facility, overlapping)));
        }

        let created = sqlx::query_as::<_, BookingRequest>(&format!(
            "INSERT INTO requests (facility_id, start_booking, end_booking, employee_id) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
            .bind(request.facility_id)
            .bind(request.window.start())
            .bind(request.window.end())
            .bind(request.employee_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Admission::Admitted(created))
    }

    async fn reschedule(&self, id: i64, change: &RequestChange) -> Result<Admission<BookingRequest>, AppError> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await.map_err(AppError::Database)?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if exists.is_none() {
            return Err(AppError::NotFound("Request not found".into()));
        }

        let facility = fetch_facility(&mut tx, change.facility_id).await?;
        let overlapping = count_overlapping(&mut tx, facility.id, &change.window, Some(id)).await?;

        if admission::decide(overlapping, &facility) == Decision::Reject {
            debug!(request_id = id, facility_id = facility.id, overlapping, "reschedule rejected");
            return Ok(Admission::Rejected(CapacityConflict::new(&facility, overlapping)));
        }

        let updated = sqlx::query_as::<_, BookingRequest>(&format!(
            "UPDATE requests SET facility_id = ?, start_booking = ?, end_booking = ? WHERE id = ? RETURNING {COLUMNS}"
        ))
            .bind(change.facility_id)
            .bind(change.window.start())
            .bind(change.window.end())
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Admission::Admitted(updated))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Request not found".into()));
        }
        Ok(())
    }

    async fn delete_by_employee(&self, employee_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM requests WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
